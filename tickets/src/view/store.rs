//! Runtime wrapper binding a scope and page size into a running view.

use crate::types::{Scope, UserId};
use crate::view::environment::ProductionTicketListEnvironment;
use crate::view::{TicketListAction, TicketListReducer, TicketListState};
use coursedesk_runtime::{EffectHandle, Store, StoreError};
use std::time::Duration;
use tokio::sync::broadcast;

type ViewStore = Store<
    TicketListState,
    TicketListAction,
    ProductionTicketListEnvironment,
    TicketListReducer,
>;

/// A running role view: a [`Store`] whose state is pinned to one scope
/// and page size.
///
/// The three constructors encode the role matrix: customers and mentors
/// get their own tickets, QAQC reviewers get all of them.
pub struct RoleView {
    store: ViewStore,
}

impl RoleView {
    fn with_scope(env: ProductionTicketListEnvironment, scope: Scope, page_size: u32) -> Self {
        Self {
            store: Store::new(
                TicketListState::new(scope, page_size),
                TicketListReducer::new(),
                env,
            ),
        }
    }

    /// The customer's view of their own tickets.
    #[must_use]
    pub fn customer(
        env: ProductionTicketListEnvironment,
        actor_id: UserId,
        page_size: u32,
    ) -> Self {
        Self::with_scope(env, Scope::Own(actor_id), page_size)
    }

    /// The mentor's view of their own tickets.
    #[must_use]
    pub fn mentor(env: ProductionTicketListEnvironment, actor_id: UserId, page_size: u32) -> Self {
        Self::with_scope(env, Scope::Own(actor_id), page_size)
    }

    /// The QAQC reviewer's view of all tickets.
    #[must_use]
    pub fn qaqc(env: ProductionTicketListEnvironment, page_size: u32) -> Self {
        Self::with_scope(env, Scope::All, page_size)
    }

    /// Dispatch an action.
    ///
    /// # Errors
    ///
    /// [`StoreError::ShutdownInProgress`] after [`Self::shutdown`].
    pub async fn send(&self, action: TicketListAction) -> Result<EffectHandle, StoreError> {
        self.store.send(action).await
    }

    /// Dispatch an action and wait until the effects it spawned (and
    /// their feedback actions) have settled.
    ///
    /// # Errors
    ///
    /// [`StoreError::ShutdownInProgress`] after shutdown,
    /// [`StoreError::Timeout`] when effects do not settle in time.
    pub async fn send_and_settle(
        &self,
        action: TicketListAction,
        timeout: Duration,
    ) -> Result<(), StoreError> {
        let mut handle = self.store.send(action).await?;
        handle
            .wait_with_timeout(timeout)
            .await
            .map_err(|()| StoreError::Timeout)
    }

    /// Read a projection of the current view state.
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&TicketListState) -> T,
    {
        self.store.state(f).await
    }

    /// Observe every action the view processes, including effect
    /// feedback. Useful for tests and for UI layers reacting to loads.
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<TicketListAction> {
        self.store.subscribe_actions()
    }

    /// Gracefully shut the view down, waiting for in-flight effects.
    ///
    /// # Errors
    ///
    /// [`StoreError::ShutdownTimeout`] when effects are still pending at
    /// the deadline.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        self.store.shutdown(timeout).await
    }
}
