//! State of a role view.

use crate::error::TicketError;
use crate::types::{
    PageRequest, ReplyOutcome, Scope, StatusFilter, Ticket, TicketId, TicketPage,
};
use chrono::{DateTime, Utc};

/// A QAQC reply being composed.
///
/// Preserved across a failed submission so the reviewer does not lose
/// their text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyDraft {
    /// The ticket being triaged
    pub ticket_id: TicketId,
    /// Chosen outcome
    pub outcome: ReplyOutcome,
    /// Reply text in progress
    pub text: String,
}

/// State of one role view of the ticket list.
///
/// The scope and page size are fixed at construction (they define the
/// role view); everything else changes as the actor navigates, searches,
/// and triages.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketListState {
    /// The authorization boundary of every query this view issues
    pub scope: Scope,
    /// Fixed page size of this view
    pub page_size: u32,
    /// The page position the actor is on, 1-based
    pub page: u32,
    /// Status filter applied to queries
    pub status: StatusFilter,
    /// Raw search box text, updated on every keystroke
    pub search_input: String,
    /// The search text the loaded page reflects; `None` when not searching
    pub applied_search: Option<String>,
    /// Monotonic counter distinguishing the latest search edit from
    /// superseded ones (debounce)
    pub search_generation: u64,
    /// The currently visible page, if one has loaded
    pub visible: Option<TicketPage>,
    /// Whether a page request is in flight
    pub loading: bool,
    /// Whether a reply submission is in flight
    pub replying: bool,
    /// The reply being composed, if any
    pub reply_draft: Option<ReplyDraft>,
    /// Last surfaced failure, dismissible
    pub error: Option<TicketError>,
    /// When the visible page was loaded
    pub last_refreshed: Option<DateTime<Utc>>,
}

impl TicketListState {
    /// Fresh state for a role view: page 1, no filters, nothing loaded.
    #[must_use]
    pub const fn new(scope: Scope, page_size: u32) -> Self {
        Self {
            scope,
            page_size,
            page: 1,
            status: StatusFilter::All,
            search_input: String::new(),
            applied_search: None,
            search_generation: 0,
            visible: None,
            loading: false,
            replying: false,
            reply_draft: None,
            error: None,
            last_refreshed: None,
        }
    }

    /// The page request describing what this view currently wants to see.
    #[must_use]
    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            page_size: self.page_size,
            search: self.applied_search.clone(),
            status: self.status,
        }
    }

    /// Total pages reported by the last load; `None` before the first.
    #[must_use]
    pub fn known_total_pages(&self) -> Option<u32> {
        self.visible.as_ref().map(|p| p.total_pages)
    }

    /// Look up a visible ticket by id.
    #[must_use]
    pub fn visible_ticket(&self, ticket_id: TicketId) -> Option<&Ticket> {
        self.visible
            .as_ref()
            .and_then(|page| page.items.iter().find(|t| t.id == ticket_id))
    }
}
