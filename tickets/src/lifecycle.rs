//! The ticket status state machine and the QAQC triage operation.
//!
//! A ticket starts `pending` and moves exactly once, to `resolved` or
//! `rejected`. [`TicketLifecycle::reply`] performs that transition: it
//! validates locally, then delegates to the store's compare-and-set so
//! that two reviewers racing on the same ticket produce one winner and
//! one [`TicketError::Conflict`].

use crate::auth::{CredentialProvider, Role};
use crate::error::TicketError;
use crate::repository::TicketRepository;
use crate::types::{ReplyOutcome, Ticket, TicketId, TicketStatus};
use std::sync::Arc;

/// Whether a ticket may move from `from` to `to`.
///
/// The only legal moves are `pending → resolved` and `pending → rejected`.
#[must_use]
pub const fn transition_allowed(from: TicketStatus, to: TicketStatus) -> bool {
    matches!(from, TicketStatus::Pending) && to.is_terminal()
}

/// Service performing the QAQC reply/triage transition.
pub struct TicketLifecycle {
    repository: Arc<dyn TicketRepository>,
    credentials: Arc<dyn CredentialProvider>,
}

impl TicketLifecycle {
    /// Wire the lifecycle to a ticket store and a credential source.
    #[must_use]
    pub fn new(
        repository: Arc<dyn TicketRepository>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            repository,
            credentials,
        }
    }

    /// Reply to a pending ticket, closing it with the chosen outcome.
    ///
    /// Local preconditions fail fast without a request: the reply text must
    /// be non-empty after trimming and the actor must hold the QAQC role.
    /// When a cached snapshot of the ticket is known to be terminal the
    /// call short-circuits with `Conflict`; the store re-checks either way.
    ///
    /// # Errors
    ///
    /// `Validation` for an empty reply, `Auth` for a missing credential or
    /// wrong role, `Conflict` when the ticket is no longer pending,
    /// `Transport` on backend failure.
    #[tracing::instrument(skip(self, reply, known_status), fields(%ticket_id, ?outcome))]
    pub async fn reply(
        &self,
        ticket_id: TicketId,
        outcome: ReplyOutcome,
        reply: &str,
        known_status: Option<TicketStatus>,
    ) -> Result<Ticket, TicketError> {
        let reply = reply.trim();
        if reply.is_empty() {
            return Err(TicketError::validation("reply must not be empty"));
        }

        let token = self.credentials.credentials()?;
        if token.role() != Role::Qaqc {
            return Err(TicketError::auth(format!(
                "replying requires the qaqc role, actor is {}",
                token.role()
            )));
        }

        if known_status.is_some_and(TicketStatus::is_terminal) {
            return Err(TicketError::Conflict(ticket_id));
        }

        let updated = self
            .repository
            .reply(&token, ticket_id, outcome, reply)
            .await?;
        tracing::info!(status = %updated.status, "ticket transitioned");
        Ok(updated)
    }
}

impl std::fmt::Debug for TicketLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketLifecycle").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code

    use super::*;
    use crate::auth::{AuthToken, StaticCredentials};
    use crate::repository::InMemoryTicketRepository;
    use crate::types::{TicketDraft, UserId};

    fn lifecycle_for(repo: &Arc<InMemoryTicketRepository>, role: Role) -> TicketLifecycle {
        let token = AuthToken::new("tok", UserId::new(), role);
        TicketLifecycle::new(repo.clone(), Arc::new(StaticCredentials::new(token)))
    }

    async fn pending_ticket(repo: &Arc<InMemoryTicketRepository>) -> Ticket {
        let sender = AuthToken::new("tok-s", UserId::new(), Role::Customer);
        repo.submit(&sender, &TicketDraft::new("Help", "something broke"))
            .await
            .unwrap()
    }

    #[test]
    fn transition_table() {
        assert!(transition_allowed(TicketStatus::Pending, TicketStatus::Resolved));
        assert!(transition_allowed(TicketStatus::Pending, TicketStatus::Rejected));
        assert!(!transition_allowed(TicketStatus::Pending, TicketStatus::Pending));
        assert!(!transition_allowed(TicketStatus::Resolved, TicketStatus::Rejected));
        assert!(!transition_allowed(TicketStatus::Rejected, TicketStatus::Resolved));
        assert!(!transition_allowed(TicketStatus::Resolved, TicketStatus::Pending));
    }

    #[tokio::test]
    async fn resolve_closes_the_ticket() {
        let repo = Arc::new(InMemoryTicketRepository::new());
        let ticket = pending_ticket(&repo).await;
        let lifecycle = lifecycle_for(&repo, Role::Qaqc);

        let updated = lifecycle
            .reply(ticket.id, ReplyOutcome::Resolve, "restarted the encoder", None)
            .await
            .unwrap();
        assert_eq!(updated.status, TicketStatus::Resolved);
        assert_eq!(updated.qaqc_reply.as_deref(), Some("restarted the encoder"));
        assert!(updated.updated_at >= updated.created_at);
    }

    #[tokio::test]
    async fn reject_closes_the_ticket() {
        let repo = Arc::new(InMemoryTicketRepository::new());
        let ticket = pending_ticket(&repo).await;
        let lifecycle = lifecycle_for(&repo, Role::Qaqc);

        let updated = lifecycle
            .reply(ticket.id, ReplyOutcome::Reject, "not reproducible", None)
            .await
            .unwrap();
        assert_eq!(updated.status, TicketStatus::Rejected);
    }

    #[tokio::test]
    async fn empty_reply_is_rejected_locally() {
        let repo = Arc::new(InMemoryTicketRepository::new());
        let ticket = pending_ticket(&repo).await;
        let lifecycle = lifecycle_for(&repo, Role::Qaqc);

        let result = lifecycle.reply(ticket.id, ReplyOutcome::Resolve, "   ", None).await;
        assert!(matches!(result, Err(TicketError::Validation(_))));
        assert!(repo.get(ticket.id).await.unwrap().is_pending());
    }

    #[tokio::test]
    async fn non_qaqc_actor_is_rejected_locally() {
        let repo = Arc::new(InMemoryTicketRepository::new());
        let ticket = pending_ticket(&repo).await;
        let lifecycle = lifecycle_for(&repo, Role::Mentor);

        let result = lifecycle.reply(ticket.id, ReplyOutcome::Resolve, "done", None).await;
        assert!(matches!(result, Err(TicketError::Auth(_))));
        assert!(repo.get(ticket.id).await.unwrap().is_pending());
    }

    #[tokio::test]
    async fn known_terminal_status_short_circuits() {
        let repo = Arc::new(InMemoryTicketRepository::new());
        let ticket = pending_ticket(&repo).await;
        let lifecycle = lifecycle_for(&repo, Role::Qaqc);

        let result = lifecycle
            .reply(ticket.id, ReplyOutcome::Resolve, "done", Some(TicketStatus::Resolved))
            .await;
        assert_eq!(result, Err(TicketError::Conflict(ticket.id)));
        // The short-circuit never reached the store.
        assert!(repo.get(ticket.id).await.unwrap().is_pending());
    }

    #[tokio::test]
    async fn second_reply_conflicts() {
        let repo = Arc::new(InMemoryTicketRepository::new());
        let ticket = pending_ticket(&repo).await;
        let lifecycle = lifecycle_for(&repo, Role::Qaqc);

        lifecycle
            .reply(ticket.id, ReplyOutcome::Resolve, "done", None)
            .await
            .unwrap();
        let second = lifecycle.reply(ticket.id, ReplyOutcome::Reject, "again", None).await;
        assert_eq!(second, Err(TicketError::Conflict(ticket.id)));
    }
}
