//! Ticket submission.
//!
//! One operation: turn a draft into a pending ticket. Input is normalized
//! (surrounding whitespace trimmed) before validation, validation and the
//! credential check both fail fast without touching the network, and a
//! transport failure creates nothing, so the caller may retry the same
//! draft.

use crate::auth::CredentialProvider;
use crate::error::TicketError;
use crate::repository::TicketRepository;
use crate::types::{Ticket, TicketDraft};
use std::sync::Arc;

/// Service creating new tickets on behalf of the current actor.
pub struct TicketSubmissionService {
    repository: Arc<dyn TicketRepository>,
    credentials: Arc<dyn CredentialProvider>,
}

impl TicketSubmissionService {
    /// Wire the service to a ticket store and a credential source.
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

    /// Submit a draft as a new pending ticket.
    ///
    /// The draft is normalized first, so a title or message of pure
    /// whitespace is rejected the same as an empty one. The draft is
    /// borrowed: on failure the caller still holds the entered values and
    /// can retry.
    ///
    /// # Errors
    ///
    /// `Validation` when title or message is empty after trimming, `Auth`
    /// when no credential is available, `Transport` when the backend call
    /// fails (nothing was created).
    #[tracing::instrument(skip(self, draft))]
    pub async fn submit(&self, draft: &TicketDraft) -> Result<Ticket, TicketError> {
        let draft = draft.clone().normalized();
        if draft.title.is_empty() {
            return Err(TicketError::validation("title must not be empty"));
        }
        if draft.message.is_empty() {
            return Err(TicketError::validation("message must not be empty"));
        }

        let token = self.credentials.credentials()?;
        let ticket = self.repository.submit(&token, &draft).await?;
        tracing::info!(ticket_id = %ticket.id, "ticket created");
        Ok(ticket)
    }
}

impl std::fmt::Debug for TicketSubmissionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketSubmissionService").finish_non_exhaustive()
    }
}
