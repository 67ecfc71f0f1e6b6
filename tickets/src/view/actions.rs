//! Actions processed by the ticket list reducer.

use crate::error::TicketError;
use crate::types::{ReplyOutcome, StatusFilter, Ticket, TicketId, TicketPage};

/// Everything that can happen to a role view: actor intents plus the
/// results of completed requests fed back by the runtime.
#[derive(Debug, Clone)]
pub enum TicketListAction {
    /// Reload the current page with the current filters.
    Refresh,

    /// Jump to an absolute page position, 1-based.
    ///
    /// Positions outside the known page range are ignored without a
    /// request.
    GoToPage(u32),

    /// Advance one page.
    NextPage,

    /// Go back one page.
    PreviousPage,

    /// Replace the status filter and reload from page 1.
    SetStatusFilter(StatusFilter),

    /// The search box changed. Starts (or restarts) the debounce timer;
    /// no request is issued yet.
    SearchInputChanged(String),

    /// The debounce timer for edit `generation` fired. Stale generations
    /// (a newer edit exists) are ignored.
    SearchSettled {
        /// The edit this timer belongs to
        generation: u64,
    },

    /// A page request completed.
    PageLoaded(TicketPage),

    /// A page request failed.
    LoadFailed(TicketError),

    /// Start composing a reply to a visible pending ticket (QAQC).
    BeginReply {
        /// The ticket being triaged
        ticket_id: TicketId,
        /// Chosen outcome
        outcome: ReplyOutcome,
    },

    /// The reply text changed.
    ReplyTextChanged(String),

    /// Submit the composed reply.
    SubmitReply,

    /// Abandon the composed reply.
    CancelReply,

    /// The reply transition succeeded; the payload is the updated ticket.
    ReplyConfirmed(Ticket),

    /// The reply transition failed. The draft is preserved for retryable
    /// failures; a conflict triggers a refresh instead.
    ReplyFailed {
        /// The ticket the reply targeted
        ticket_id: TicketId,
        /// Why it failed
        error: TicketError,
    },

    /// Clear the surfaced error.
    DismissError,
}
