//! Coursedesk support tickets - the service-ticket subsystem of a role-based
//! education platform.
//!
//! Customers and mentors submit tickets against courses and classes; QAQC
//! reviewers triage them. Three separate per-role pages used to reimplement
//! the same fetch/paginate/filter/reply logic; this crate consolidates them
//! into one parametrised feature:
//!
//! - **[`repository`]**: the only layer touching the remote ticket store
//!   (HTTP wire contract, plus an in-memory backend for tests and demos)
//! - **[`submission`]**: validated ticket creation
//! - **[`lifecycle`]**: the ticket status state machine and the QAQC
//!   reply/triage operation
//! - **[`query`]**: scoped, paginated, filtered listing
//! - **[`view`]**: the role view - a reducer-driven feature holding the
//!   current page/search/filter parameters and the visible ticket page
//!
//! # Ticket lifecycle
//!
//! ```text
//!              reply(Resolve)
//!   pending ───────────────────▶ resolved   (terminal)
//!      │
//!      │       reply(Reject)
//!      └────────────────────────▶ rejected  (terminal)
//! ```
//!
//! A ticket is created `pending` and transitions exactly once. The reply
//! operation is conditional on the ticket still being `pending`
//! (compare-and-set at the store boundary), so concurrent QAQC sessions
//! cannot both resolve the same ticket.
//!
//! # Example
//!
//! ```ignore
//! use coursedesk_tickets::prelude::*;
//!
//! let repo: Arc<dyn TicketRepository> = Arc::new(HttpTicketRepository::new(&config.api)?);
//! let env = ProductionTicketListEnvironment::from_repository(
//!     repo,
//!     Arc::new(StaticCredentials::new(token)),
//!     Arc::new(SystemClock),
//!     Duration::from_millis(config.view.search_debounce_ms),
//! );
//!
//! let view = RoleView::qaqc(env, config.view.qaqc_page_size);
//! view.send(TicketListAction::Refresh).await?;
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod query;
pub mod repository;
pub mod submission;
pub mod types;
pub mod view;

/// Commonly used items, re-exported for call sites that wire the subsystem.
pub mod prelude {
    pub use crate::auth::{AuthToken, CredentialProvider, Role, StaticCredentials};
    pub use crate::config::Config;
    pub use crate::error::TicketError;
    pub use crate::lifecycle::TicketLifecycle;
    pub use crate::query::TicketQueryEngine;
    pub use crate::repository::http::HttpTicketRepository;
    pub use crate::repository::memory::InMemoryTicketRepository;
    pub use crate::repository::TicketRepository;
    pub use crate::submission::TicketSubmissionService;
    pub use crate::types::{
        PageRequest, ReplyOutcome, Scope, StatusFilter, Ticket, TicketDraft, TicketId, TicketPage,
        TicketStatus, UserId,
    };
    pub use crate::view::{
        ProductionTicketListEnvironment, RoleView, TicketListAction, TicketListReducer,
        TicketListState,
    };
}
