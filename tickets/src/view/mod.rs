//! The role view: one reducer-driven feature behind all three ticket
//! pages.
//!
//! The customer, mentor, and QAQC pages used to each carry their own
//! fetch/paginate/filter logic. Here they are a single feature
//! parametrised by scope and page size:
//!
//! ```text
//! user intent ──▶ TicketListAction ──▶ TicketListReducer ──▶ effects
//!                        ▲                                      │
//!                        └── PageLoaded / LoadFailed / ... ◀────┘
//! ```
//!
//! The reducer is pure; loading pages and submitting replies happen in
//! effects executed by the store runtime, which feeds the results back
//! in as actions. Search input is debounced inside the reducer with a
//! generation counter and a delayed action, so only the last edit in a
//! burst becomes a query.

pub mod actions;
pub mod environment;
pub mod reducer;
pub mod state;
pub mod store;
#[cfg(test)]
mod tests;

pub use actions::TicketListAction;
pub use environment::{ProductionTicketListEnvironment, TicketListEnvironment};
pub use reducer::TicketListReducer;
pub use state::{ReplyDraft, TicketListState};
pub use store::RoleView;
