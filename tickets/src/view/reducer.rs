//! Reducer for the ticket list role view.

use crate::error::TicketError;
use crate::lifecycle::TicketLifecycle;
use crate::query::TicketQueryEngine;
use crate::types::{PageRequest, Scope, TicketStatus};
use crate::view::environment::{ProductionTicketListEnvironment, TicketListEnvironment};
use crate::view::{ReplyDraft, TicketListAction, TicketListState};
use coursedesk_core::{effect::Effect, reducer::Reducer};
use smallvec::{SmallVec, smallvec};
use std::sync::Arc;

/// Reducer driving one role view of the ticket list.
///
/// All three role pages (customer, mentor, QAQC) run this same reducer;
/// they differ only in the scope and page size baked into the state and
/// in which actions their UI emits (only the QAQC page emits reply
/// actions - and the backend rejects the transition for anyone else).
#[derive(Clone)]
pub struct TicketListReducer;

impl TicketListReducer {
    /// Create a new ticket list reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for TicketListReducer {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the effect that loads the page described by `request`.
fn load_page_effect(
    engine: Arc<TicketQueryEngine>,
    scope: Scope,
    request: PageRequest,
) -> Effect<TicketListAction> {
    Effect::future(async move {
        match engine.list(scope, &request).await {
            Ok(page) => Some(TicketListAction::PageLoaded(page)),
            Err(error) => Some(TicketListAction::LoadFailed(error)),
        }
    })
}

/// Build the effect that submits a composed reply.
fn submit_reply_effect(
    lifecycle: Arc<TicketLifecycle>,
    draft: ReplyDraft,
    known_status: Option<TicketStatus>,
) -> Effect<TicketListAction> {
    let ticket_id = draft.ticket_id;
    Effect::future(async move {
        match lifecycle
            .reply(draft.ticket_id, draft.outcome, &draft.text, known_status)
            .await
        {
            Ok(ticket) => Some(TicketListAction::ReplyConfirmed(ticket)),
            Err(error) => Some(TicketListAction::ReplyFailed { ticket_id, error }),
        }
    })
}

fn begin_load(
    state: &mut TicketListState,
    env: &ProductionTicketListEnvironment,
) -> SmallVec<[Effect<TicketListAction>; 4]> {
    state.loading = true;
    state.error = None;
    smallvec![load_page_effect(
        env.query_engine(),
        state.scope,
        state.page_request()
    )]
}

impl Reducer for TicketListReducer {
    type State = TicketListState;
    type Action = TicketListAction;
    type Environment = ProductionTicketListEnvironment;

    #[allow(clippy::too_many_lines)]
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TicketListAction::Refresh => begin_load(state, env),

            TicketListAction::GoToPage(page) => {
                if !page_in_range(state, page) {
                    return smallvec![Effect::None];
                }
                state.page = page;
                begin_load(state, env)
            },

            TicketListAction::NextPage => {
                self.reduce(state, TicketListAction::GoToPage(state.page + 1), env)
            },

            TicketListAction::PreviousPage => {
                if state.page <= 1 {
                    return smallvec![Effect::None];
                }
                self.reduce(state, TicketListAction::GoToPage(state.page - 1), env)
            },

            TicketListAction::SetStatusFilter(filter) => {
                if filter == state.status {
                    return smallvec![Effect::None];
                }
                state.status = filter;
                state.page = 1;
                begin_load(state, env)
            },

            TicketListAction::SearchInputChanged(text) => {
                state.search_input = text;
                state.search_generation += 1;
                smallvec![Effect::Delay {
                    duration: env.search_debounce(),
                    action: Box::new(TicketListAction::SearchSettled {
                        generation: state.search_generation,
                    }),
                }]
            },

            TicketListAction::SearchSettled { generation } => {
                // A newer edit restarted the timer; this one is stale.
                if generation != state.search_generation {
                    return smallvec![Effect::None];
                }

                let trimmed = state.search_input.trim();
                let applied = if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                };
                if applied == state.applied_search {
                    return smallvec![Effect::None];
                }

                state.applied_search = applied;
                state.page = 1;
                begin_load(state, env)
            },

            TicketListAction::PageLoaded(page) => {
                state.loading = false;
                // The engine may have clamped the position.
                state.page = page.page;
                state.visible = Some(page);
                state.last_refreshed = Some(env.clock().now());
                smallvec![Effect::None]
            },

            TicketListAction::LoadFailed(error) => {
                state.loading = false;
                // A failed fetch shows an empty list, not stale data.
                state.visible = None;
                state.error = Some(error);
                smallvec![Effect::None]
            },

            TicketListAction::BeginReply { ticket_id, outcome } => {
                // Only a visible, still-pending ticket can be triaged.
                let Some(ticket) = state.visible_ticket(ticket_id) else {
                    return smallvec![Effect::None];
                };
                if !ticket.is_pending() {
                    return smallvec![Effect::None];
                }
                state.reply_draft = Some(ReplyDraft {
                    ticket_id,
                    outcome,
                    text: String::new(),
                });
                smallvec![Effect::None]
            },

            TicketListAction::ReplyTextChanged(text) => {
                if let Some(draft) = &mut state.reply_draft {
                    draft.text = text;
                }
                smallvec![Effect::None]
            },

            TicketListAction::SubmitReply => {
                if state.replying {
                    return smallvec![Effect::None];
                }
                let Some(draft) = state.reply_draft.clone() else {
                    return smallvec![Effect::None];
                };
                if draft.text.trim().is_empty() {
                    // Keep the draft; the reviewer corrects and resubmits.
                    state.error = Some(TicketError::validation("reply must not be empty"));
                    return smallvec![Effect::None];
                }

                state.replying = true;
                state.error = None;
                let known_status = state.visible_ticket(draft.ticket_id).map(|t| t.status);
                smallvec![submit_reply_effect(env.lifecycle(), draft, known_status)]
            },

            TicketListAction::CancelReply => {
                state.reply_draft = None;
                smallvec![Effect::None]
            },

            TicketListAction::ReplyConfirmed(ticket) => {
                state.replying = false;
                state.reply_draft = None;

                // If the filter no longer matches the updated ticket the
                // page contents shifted; otherwise patch in place.
                if state.status.matches(ticket.status) {
                    if let Some(page) = &mut state.visible {
                        if let Some(slot) = page.items.iter_mut().find(|t| t.id == ticket.id) {
                            *slot = ticket;
                        }
                    }
                    smallvec![Effect::None]
                } else {
                    begin_load(state, env)
                }
            },

            TicketListAction::ReplyFailed { ticket_id, error } => {
                state.replying = false;
                match &error {
                    // The cached list was stale; drop the draft and reload.
                    TicketError::Conflict(_) => {
                        tracing::warn!(%ticket_id, "reply conflicted, refreshing list");
                        state.reply_draft = None;
                        state.error = Some(error);
                        state.loading = true;
                        smallvec![load_page_effect(
                            env.query_engine(),
                            state.scope,
                            state.page_request()
                        )]
                    },
                    // Keep the draft so the text survives a retry.
                    _ => {
                        state.error = Some(error);
                        smallvec![Effect::None]
                    },
                }
            },

            TicketListAction::DismissError => {
                state.error = None;
                smallvec![Effect::None]
            },
        }
    }
}

/// Whether `page` is a position this view may navigate to without a
/// round trip. Before the first load any positive page is allowed.
fn page_in_range(state: &TicketListState, page: u32) -> bool {
    if page < 1 {
        return false;
    }
    match state.known_total_pages() {
        Some(0) => page == 1,
        Some(total) => page <= total,
        None => true,
    }
}
