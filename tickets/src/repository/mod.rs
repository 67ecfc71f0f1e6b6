//! Access to the authoritative ticket store.
//!
//! [`TicketRepository`] is the only seam through which the subsystem
//! reaches the persisted ticket collection. It mirrors the collaborator
//! operations of the remote platform API: submit, scoped list, conditional
//! reply, and user resolution. Everything above this trait works with
//! domain entities; wire formats stay inside the implementations.

use crate::auth::AuthToken;
use crate::error::TicketError;
use crate::types::{PageRequest, ReplyOutcome, Scope, Ticket, TicketDraft, TicketId, TicketPage, UserId};
use async_trait::async_trait;

pub mod http;
pub mod memory;

pub use http::HttpTicketRepository;
pub use memory::InMemoryTicketRepository;

/// A resolved platform user, used to enrich `replied_by` into a display
/// name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    /// The user's id
    pub id: UserId,
    /// The user's display name
    pub full_name: String,
}

/// Client abstraction over the authoritative ticket store.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Create one new pending ticket on behalf of the token's actor.
    ///
    /// # Errors
    ///
    /// `Auth` when the credential is rejected, `Transport` on
    /// network/backend failure (the ticket is not created and the call is
    /// safe to retry).
    async fn submit(&self, token: &AuthToken, draft: &TicketDraft) -> Result<Ticket, TicketError>;

    /// Fetch one page of tickets within `scope`.
    ///
    /// `Scope::All` is privileged: implementations must reject it for
    /// non-QAQC credentials, and must never return tickets outside the
    /// scope. An empty page is a valid, non-error outcome.
    ///
    /// # Errors
    ///
    /// `Auth` when the credential or scope is rejected, `Transport` on
    /// network/backend failure.
    async fn list(
        &self,
        token: &AuthToken,
        scope: Scope,
        request: &PageRequest,
    ) -> Result<TicketPage, TicketError>;

    /// Transition a pending ticket to the terminal status chosen by
    /// `outcome`, recording the reply.
    ///
    /// The transition is conditional on the ticket still being pending
    /// (compare-and-set): when it has already been triaged the call fails
    /// with `Conflict` and the ticket is left unchanged.
    ///
    /// # Errors
    ///
    /// `Conflict` when the ticket is no longer pending, `Auth` when the
    /// credential is rejected, `Transport` on network/backend failure.
    async fn reply(
        &self,
        token: &AuthToken,
        ticket_id: TicketId,
        outcome: ReplyOutcome,
        reply: &str,
    ) -> Result<Ticket, TicketError>;

    /// Resolve a user id into a profile (display-name enrichment).
    ///
    /// # Errors
    ///
    /// `Transport` when the user cannot be resolved; callers degrade to a
    /// placeholder and never abort a listing over this.
    async fn resolve_user(&self, user_id: UserId) -> Result<UserProfile, TicketError>;
}
