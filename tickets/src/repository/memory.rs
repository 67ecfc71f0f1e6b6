//! In-memory [`TicketRepository`] for tests and demos.
//!
//! Behaves like the real backend as observed through the trait: scope
//! enforcement, server-side search and status filtering, newest-first
//! ordering, 1-based pagination, and the compare-and-set reply transition.

use crate::auth::{AuthToken, Role};
use crate::error::TicketError;
use crate::query::matches_search;
use crate::repository::{TicketRepository, UserProfile};
use crate::types::{
    PageRequest, ReplyOutcome, Scope, Ticket, TicketDraft, TicketId, TicketPage, UserId,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    tickets: Vec<Ticket>,
    users: HashMap<UserId, String>,
}

/// Ticket store backed by process memory.
#[derive(Clone, Default)]
pub struct InMemoryTicketRepository {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryTicketRepository {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user so [`TicketRepository::resolve_user`] can find them.
    pub async fn register_user(&self, user_id: UserId, full_name: impl Into<String>) {
        self.inner.write().await.users.insert(user_id, full_name.into());
    }

    /// Seed a ticket directly, bypassing submission. Test setup only.
    pub async fn seed(&self, ticket: Ticket) {
        self.inner.write().await.tickets.push(ticket);
    }

    /// Snapshot of a single ticket.
    pub async fn get(&self, ticket_id: TicketId) -> Option<Ticket> {
        self.inner
            .read()
            .await
            .tickets
            .iter()
            .find(|t| t.id == ticket_id)
            .cloned()
    }

    /// Number of stored tickets, across all scopes.
    pub async fn len(&self) -> usize {
        self.inner.read().await.tickets.len()
    }

    /// Whether the store holds no tickets.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.tickets.is_empty()
    }
}

fn in_scope(ticket: &Ticket, scope: Scope) -> bool {
    match scope {
        Scope::Own(owner) => ticket.sender_id == owner,
        Scope::All => true,
    }
}

#[async_trait]
impl TicketRepository for InMemoryTicketRepository {
    async fn submit(&self, token: &AuthToken, draft: &TicketDraft) -> Result<Ticket, TicketError> {
        if draft.title.is_empty() || draft.message.is_empty() {
            return Err(TicketError::validation("title and message must not be empty"));
        }

        let ticket = Ticket::submitted(TicketId::new(), token.actor_id(), draft, Utc::now());
        self.inner.write().await.tickets.push(ticket.clone());
        Ok(ticket)
    }

    #[allow(clippy::cast_possible_truncation)] // Page indices fit in usize
    async fn list(
        &self,
        token: &AuthToken,
        scope: Scope,
        request: &PageRequest,
    ) -> Result<TicketPage, TicketError> {
        // The privileged scope is reserved for QAQC reviewers; the own
        // scope must belong to the requesting actor.
        match scope {
            Scope::All if token.role() != Role::Qaqc => {
                return Err(TicketError::auth("listing all tickets requires the qaqc role"));
            },
            Scope::Own(owner) if owner != token.actor_id() => {
                return Err(TicketError::auth("cannot list another actor's tickets"));
            },
            _ => {},
        }

        let inner = self.inner.read().await;
        let mut matching: Vec<&Ticket> = inner
            .tickets
            .iter()
            .filter(|t| in_scope(t, scope))
            .filter(|t| request.status.matches(t.status))
            .filter(|t| {
                request
                    .search
                    .as_deref()
                    .is_none_or(|needle| matches_search(t, needle))
            })
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total_items = matching.len() as u64;
        let page_size = request.page_size.max(1);
        let total_pages = u32::try_from(total_items.div_ceil(u64::from(page_size)))
            .unwrap_or(u32::MAX);

        // Pages are 1-based; treat a raw page 0 as the first page
        let page = request.page.max(1);
        let start = (page - 1) as usize * page_size as usize;
        let items: Vec<Ticket> = matching
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .cloned()
            .collect();

        Ok(TicketPage {
            items,
            page,
            page_size,
            total_pages,
            total_items,
        })
    }

    async fn reply(
        &self,
        token: &AuthToken,
        ticket_id: TicketId,
        outcome: ReplyOutcome,
        reply: &str,
    ) -> Result<Ticket, TicketError> {
        if token.role() != Role::Qaqc {
            return Err(TicketError::auth("replying requires the qaqc role"));
        }

        let mut inner = self.inner.write().await;
        let ticket = inner
            .tickets
            .iter_mut()
            .find(|t| t.id == ticket_id)
            .ok_or_else(|| TicketError::transport(format!("no such ticket {ticket_id}")))?;

        // Compare-and-set: the transition only fires from pending.
        if !ticket.is_pending() {
            return Err(TicketError::Conflict(ticket_id));
        }

        ticket.status = outcome.terminal_status();
        ticket.qaqc_reply = Some(reply.to_string());
        ticket.replied_by = Some(token.actor_id());
        ticket.updated_at = Utc::now();
        Ok(ticket.clone())
    }

    async fn resolve_user(&self, user_id: UserId) -> Result<UserProfile, TicketError> {
        let inner = self.inner.read().await;
        inner
            .users
            .get(&user_id)
            .map(|full_name| UserProfile {
                id: user_id,
                full_name: full_name.clone(),
            })
            .ok_or_else(|| TicketError::transport(format!("unknown user {user_id}")))
    }
}
