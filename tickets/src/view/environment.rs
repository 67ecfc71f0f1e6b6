//! Environment dependencies for the ticket list reducer.

use crate::auth::CredentialProvider;
use crate::lifecycle::TicketLifecycle;
use crate::query::TicketQueryEngine;
use crate::repository::TicketRepository;
use coursedesk_core::environment::Clock;
use std::sync::Arc;
use std::time::Duration;

/// Dependencies a role view needs: the query engine for loading pages,
/// the lifecycle for the triage transition, a clock, and the search
/// debounce interval.
///
/// Effects spawned by the reducer outlive the `reduce` call, so the
/// services are handed out as owned `Arc`s.
pub trait TicketListEnvironment: Send + Sync {
    /// The listing query engine.
    fn query_engine(&self) -> Arc<TicketQueryEngine>;

    /// The triage lifecycle service.
    fn lifecycle(&self) -> Arc<TicketLifecycle>;

    /// Clock for timestamps.
    ///
    /// Production uses `SystemClock`, tests use `FixedClock`.
    fn clock(&self) -> &dyn Clock;

    /// Quiet period before a search edit becomes a query.
    fn search_debounce(&self) -> Duration;
}

/// Production environment for a role view.
#[derive(Clone)]
pub struct ProductionTicketListEnvironment {
    query: Arc<TicketQueryEngine>,
    lifecycle: Arc<TicketLifecycle>,
    clock: Arc<dyn Clock>,
    search_debounce: Duration,
}

impl ProductionTicketListEnvironment {
    /// Build from already-wired services.
    #[must_use]
    pub fn new(
        query: Arc<TicketQueryEngine>,
        lifecycle: Arc<TicketLifecycle>,
        clock: Arc<dyn Clock>,
        search_debounce: Duration,
    ) -> Self {
        Self {
            query,
            lifecycle,
            clock,
            search_debounce,
        }
    }

    /// Wire the query engine and lifecycle from a repository and a
    /// credential source.
    #[must_use]
    pub fn from_repository(
        repository: Arc<dyn TicketRepository>,
        credentials: Arc<dyn CredentialProvider>,
        clock: Arc<dyn Clock>,
        search_debounce: Duration,
    ) -> Self {
        Self::new(
            Arc::new(TicketQueryEngine::new(repository.clone(), credentials.clone())),
            Arc::new(TicketLifecycle::new(repository, credentials)),
            clock,
            search_debounce,
        )
    }
}

impl TicketListEnvironment for ProductionTicketListEnvironment {
    fn query_engine(&self) -> Arc<TicketQueryEngine> {
        self.query.clone()
    }

    fn lifecycle(&self) -> Arc<TicketLifecycle> {
        self.lifecycle.clone()
    }

    fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    fn search_debounce(&self) -> Duration {
        self.search_debounce
    }
}
