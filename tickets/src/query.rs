//! Scoped, paginated, filtered ticket listing.
//!
//! [`TicketQueryEngine`] sits between the role views and the store. It
//! enforces the scope/role authorization boundary a second time (the
//! repository also checks it), clamps out-of-range page requests, and
//! enriches triaged tickets with the reviewer's display name.

use crate::auth::{AuthToken, CredentialProvider, Role};
use crate::error::TicketError;
use crate::repository::TicketRepository;
use crate::types::{PageRequest, Scope, Ticket, TicketPage, UserId};
use std::collections::HashMap;
use std::sync::Arc;

/// Placeholder shown when a reviewer's display name cannot be resolved.
pub const UNKNOWN_REVIEWER: &str = "QAQC reviewer";

/// Case-insensitive match of `needle` against a ticket's searchable text:
/// title, message, and the associated course title.
#[must_use]
pub fn matches_search(ticket: &Ticket, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    if needle.is_empty() {
        return true;
    }

    ticket.title.to_lowercase().contains(&needle)
        || ticket.message.to_lowercase().contains(&needle)
        || ticket
            .course
            .as_ref()
            .is_some_and(|c| c.title.to_lowercase().contains(&needle))
}

/// Clamp a requested page into `1..=total_pages`.
///
/// A query with no matches has zero pages; page 1 is still the canonical
/// position for it.
#[must_use]
pub const fn clamp_page(requested: u32, total_pages: u32) -> u32 {
    if total_pages == 0 {
        1
    } else if requested < 1 {
        1
    } else if requested > total_pages {
        total_pages
    } else {
        requested
    }
}

/// Query service for ticket listings.
pub struct TicketQueryEngine {
    repository: Arc<dyn TicketRepository>,
    credentials: Arc<dyn CredentialProvider>,
}

impl TicketQueryEngine {
    /// Wire the engine to a ticket store and a credential source.
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

    /// Fetch one page of tickets within `scope`.
    ///
    /// When the store reports fewer pages than the requested position (the
    /// collection shrank between requests), the request is re-issued once
    /// at the last valid page, so the caller always lands on a real page.
    ///
    /// # Errors
    ///
    /// `Auth` when no credential is available or the scope exceeds the
    /// actor's role, `Transport` on backend failure.
    #[tracing::instrument(skip(self, request), fields(page = request.page))]
    pub async fn list(
        &self,
        scope: Scope,
        request: &PageRequest,
    ) -> Result<TicketPage, TicketError> {
        let token = self.credentials.credentials()?;
        authorize_scope(&token, scope)?;

        let mut page = self.repository.list(&token, scope, request).await?;

        if page.total_pages > 0 && request.page > page.total_pages {
            let clamped = PageRequest {
                page: page.total_pages,
                ..request.clone()
            };
            tracing::debug!(
                requested = request.page,
                clamped = clamped.page,
                "page out of range, re-requesting last page"
            );
            page = self.repository.list(&token, scope, &clamped).await?;
        }

        self.enrich_reviewer_names(&mut page.items).await;
        Ok(page)
    }

    /// Fill in `replied_by_name` for every triaged ticket on the page.
    ///
    /// Lookups are memoized per page and failures degrade to
    /// [`UNKNOWN_REVIEWER`]; a listing never fails over name resolution.
    async fn enrich_reviewer_names(&self, tickets: &mut [Ticket]) {
        let mut names: HashMap<UserId, String> = HashMap::new();

        for ticket in tickets.iter_mut() {
            let Some(reviewer) = ticket.replied_by else {
                continue;
            };

            if !names.contains_key(&reviewer) {
                let name = match self.repository.resolve_user(reviewer).await {
                    Ok(profile) => profile.full_name,
                    Err(error) => {
                        tracing::warn!(%reviewer, %error, "reviewer lookup failed, using placeholder");
                        UNKNOWN_REVIEWER.to_string()
                    },
                };
                names.insert(reviewer, name);
            }
            ticket.replied_by_name = names.get(&reviewer).cloned();
        }
    }
}

fn authorize_scope(token: &AuthToken, scope: Scope) -> Result<(), TicketError> {
    match scope {
        Scope::All if token.role() != Role::Qaqc => Err(TicketError::auth(
            "listing all tickets requires the qaqc role",
        )),
        Scope::Own(owner) if owner != token.actor_id() => {
            Err(TicketError::auth("cannot list another actor's tickets"))
        },
        _ => Ok(()),
    }
}

impl std::fmt::Debug for TicketQueryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketQueryEngine").finish_non_exhaustive()
    }
}
