//! Reducer tests for the ticket list role view.

#![allow(clippy::unwrap_used)] // Test code

use crate::auth::{AuthToken, Role, StaticCredentials};
use crate::error::TicketError;
use crate::repository::InMemoryTicketRepository;
use crate::types::{
    ReplyOutcome, Scope, StatusFilter, Ticket, TicketDraft, TicketId, TicketPage, TicketStatus,
    UserId,
};
use crate::view::environment::ProductionTicketListEnvironment;
use crate::view::{ReplyDraft, TicketListAction, TicketListReducer, TicketListState};
use chrono::Utc;
use coursedesk_core::environment::Clock;
use coursedesk_testing::{ReducerTest, assertions, test_clock};
use std::sync::Arc;
use std::time::Duration;

fn test_env() -> ProductionTicketListEnvironment {
    let repo = Arc::new(InMemoryTicketRepository::new());
    let credentials = Arc::new(StaticCredentials::new(AuthToken::new(
        "tok",
        UserId::new(),
        Role::Qaqc,
    )));
    ProductionTicketListEnvironment::from_repository(
        repo,
        credentials,
        Arc::new(test_clock()),
        Duration::from_millis(300),
    )
}

fn pending_ticket() -> Ticket {
    Ticket::submitted(
        TicketId::new(),
        UserId::new(),
        &TicketDraft::new("Broken video", "Lesson 3 does not play"),
        Utc::now(),
    )
}

fn resolved_ticket() -> Ticket {
    let mut ticket = pending_ticket();
    ticket.status = TicketStatus::Resolved;
    ticket.qaqc_reply = Some("fixed".to_string());
    ticket.replied_by = Some(UserId::new());
    ticket
}

/// State with one loaded page holding `items` and the given page count.
fn state_with_page(items: Vec<Ticket>, page: u32, total_pages: u32) -> TicketListState {
    let total_items = u64::from(total_pages) * 6;
    let mut state = TicketListState::new(Scope::All, 6);
    state.page = page;
    state.visible = Some(TicketPage {
        items,
        page,
        page_size: 6,
        total_pages,
        total_items,
    });
    state
}

// ============================================================================
// Loading and pagination
// ============================================================================

#[test]
fn refresh_sets_loading_and_issues_a_load() {
    ReducerTest::new(TicketListReducer::new())
        .with_env(test_env())
        .given_state(TicketListState::new(Scope::All, 6))
        .when_action(TicketListAction::Refresh)
        .then_state(|state| {
            assert!(state.loading);
            assert!(state.error.is_none());
        })
        .then_effects(assertions::assert_has_future_effect)
        .run();
}

#[test]
fn go_to_page_within_range_loads() {
    ReducerTest::new(TicketListReducer::new())
        .with_env(test_env())
        .given_state(state_with_page(vec![], 1, 3))
        .when_action(TicketListAction::GoToPage(2))
        .then_state(|state| {
            assert_eq!(state.page, 2);
            assert!(state.loading);
        })
        .then_effects(assertions::assert_has_future_effect)
        .run();
}

#[test]
fn go_to_page_beyond_known_range_is_ignored() {
    ReducerTest::new(TicketListReducer::new())
        .with_env(test_env())
        .given_state(state_with_page(vec![], 1, 3))
        .when_action(TicketListAction::GoToPage(7))
        .then_state(|state| {
            assert_eq!(state.page, 1);
            assert!(!state.loading);
        })
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn go_to_page_zero_is_ignored() {
    ReducerTest::new(TicketListReducer::new())
        .with_env(test_env())
        .given_state(state_with_page(vec![], 2, 3))
        .when_action(TicketListAction::GoToPage(0))
        .then_state(|state| assert_eq!(state.page, 2))
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn next_page_on_the_last_page_is_ignored() {
    ReducerTest::new(TicketListReducer::new())
        .with_env(test_env())
        .given_state(state_with_page(vec![], 3, 3))
        .when_action(TicketListAction::NextPage)
        .then_state(|state| assert_eq!(state.page, 3))
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn previous_page_on_the_first_page_is_ignored() {
    ReducerTest::new(TicketListReducer::new())
        .with_env(test_env())
        .given_state(state_with_page(vec![], 1, 3))
        .when_action(TicketListAction::PreviousPage)
        .then_state(|state| assert_eq!(state.page, 1))
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn empty_collection_pins_navigation_to_page_one() {
    ReducerTest::new(TicketListReducer::new())
        .with_env(test_env())
        .given_state(state_with_page(vec![], 1, 0))
        .when_action(TicketListAction::GoToPage(2))
        .then_state(|state| assert_eq!(state.page, 1))
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn page_loaded_updates_visible_and_timestamp() {
    let page = TicketPage {
        items: vec![pending_ticket()],
        page: 2,
        page_size: 6,
        total_pages: 4,
        total_items: 20,
    };
    ReducerTest::new(TicketListReducer::new())
        .with_env(test_env())
        .given_state(TicketListState::new(Scope::All, 6))
        .when_action(TicketListAction::PageLoaded(page))
        .then_state(|state| {
            assert!(!state.loading);
            assert_eq!(state.page, 2);
            assert_eq!(state.visible.as_ref().unwrap().items.len(), 1);
            assert_eq!(state.last_refreshed, Some(test_clock().now()));
        })
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn load_failure_surfaces_the_error() {
    ReducerTest::new(TicketListReducer::new())
        .with_env(test_env())
        .given_state(TicketListState::new(Scope::All, 6))
        .when_action(TicketListAction::LoadFailed(TicketError::transport(
            "connection reset",
        )))
        .then_state(|state| {
            assert!(!state.loading);
            assert!(state.visible.is_none());
            assert!(matches!(state.error, Some(TicketError::Transport(_))));
        })
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn changing_the_status_filter_resets_to_page_one() {
    ReducerTest::new(TicketListReducer::new())
        .with_env(test_env())
        .given_state(state_with_page(vec![], 3, 5))
        .when_action(TicketListAction::SetStatusFilter(StatusFilter::Only(
            TicketStatus::Pending,
        )))
        .then_state(|state| {
            assert_eq!(state.page, 1);
            assert_eq!(state.status, StatusFilter::Only(TicketStatus::Pending));
            assert!(state.loading);
        })
        .then_effects(assertions::assert_has_future_effect)
        .run();
}

#[test]
fn reapplying_the_same_status_filter_is_a_noop() {
    ReducerTest::new(TicketListReducer::new())
        .with_env(test_env())
        .given_state(state_with_page(vec![], 3, 5))
        .when_action(TicketListAction::SetStatusFilter(StatusFilter::All))
        .then_state(|state| assert_eq!(state.page, 3))
        .then_effects(assertions::assert_no_effects)
        .run();
}

// ============================================================================
// Search debounce
// ============================================================================

#[test]
fn search_edit_starts_a_debounce_timer_without_loading() {
    ReducerTest::new(TicketListReducer::new())
        .with_env(test_env())
        .given_state(TicketListState::new(Scope::All, 6))
        .when_action(TicketListAction::SearchInputChanged("video".to_string()))
        .then_state(|state| {
            assert_eq!(state.search_input, "video");
            assert_eq!(state.search_generation, 1);
            assert!(state.applied_search.is_none());
            assert!(!state.loading);
        })
        .then_effects(assertions::assert_has_delay_effect)
        .run();
}

#[test]
fn stale_debounce_timer_is_ignored() {
    let mut state = TicketListState::new(Scope::All, 6);
    state.search_input = "video player".to_string();
    state.search_generation = 5;

    ReducerTest::new(TicketListReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(TicketListAction::SearchSettled { generation: 3 })
        .then_state(|state| {
            assert!(state.applied_search.is_none());
            assert!(!state.loading);
        })
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn latest_debounce_timer_applies_the_search_and_loads() {
    let mut state = TicketListState::new(Scope::All, 6);
    state.search_input = "  video  ".to_string();
    state.search_generation = 2;
    state.page = 4;

    ReducerTest::new(TicketListReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(TicketListAction::SearchSettled { generation: 2 })
        .then_state(|state| {
            assert_eq!(state.applied_search.as_deref(), Some("video"));
            assert_eq!(state.page, 1);
            assert!(state.loading);
        })
        .then_effects(assertions::assert_has_future_effect)
        .run();
}

#[test]
fn settling_on_the_already_applied_search_is_a_noop() {
    let mut state = TicketListState::new(Scope::All, 6);
    state.search_input = "video".to_string();
    state.applied_search = Some("video".to_string());
    state.search_generation = 3;

    ReducerTest::new(TicketListReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(TicketListAction::SearchSettled { generation: 3 })
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn clearing_the_search_box_clears_the_applied_search() {
    let mut state = TicketListState::new(Scope::All, 6);
    state.search_input = String::new();
    state.applied_search = Some("video".to_string());
    state.search_generation = 4;

    ReducerTest::new(TicketListReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(TicketListAction::SearchSettled { generation: 4 })
        .then_state(|state| {
            assert!(state.applied_search.is_none());
            assert!(state.loading);
        })
        .then_effects(assertions::assert_has_future_effect)
        .run();
}

// ============================================================================
// Reply workflow
// ============================================================================

#[test]
fn begin_reply_on_a_visible_pending_ticket_opens_a_draft() {
    let ticket = pending_ticket();
    let ticket_id = ticket.id;

    ReducerTest::new(TicketListReducer::new())
        .with_env(test_env())
        .given_state(state_with_page(vec![ticket], 1, 1))
        .when_action(TicketListAction::BeginReply {
            ticket_id,
            outcome: ReplyOutcome::Resolve,
        })
        .then_state(move |state| {
            let draft = state.reply_draft.as_ref().unwrap();
            assert_eq!(draft.ticket_id, ticket_id);
            assert_eq!(draft.outcome, ReplyOutcome::Resolve);
            assert!(draft.text.is_empty());
        })
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn begin_reply_on_a_terminal_ticket_is_ignored() {
    let ticket = resolved_ticket();
    let ticket_id = ticket.id;

    ReducerTest::new(TicketListReducer::new())
        .with_env(test_env())
        .given_state(state_with_page(vec![ticket], 1, 1))
        .when_action(TicketListAction::BeginReply {
            ticket_id,
            outcome: ReplyOutcome::Reject,
        })
        .then_state(|state| assert!(state.reply_draft.is_none()))
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn begin_reply_on_an_unknown_ticket_is_ignored() {
    ReducerTest::new(TicketListReducer::new())
        .with_env(test_env())
        .given_state(state_with_page(vec![pending_ticket()], 1, 1))
        .when_action(TicketListAction::BeginReply {
            ticket_id: TicketId::new(),
            outcome: ReplyOutcome::Resolve,
        })
        .then_state(|state| assert!(state.reply_draft.is_none()))
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn submitting_an_empty_reply_keeps_the_draft_and_errors() {
    let ticket = pending_ticket();
    let mut state = state_with_page(vec![ticket.clone()], 1, 1);
    state.reply_draft = Some(ReplyDraft {
        ticket_id: ticket.id,
        outcome: ReplyOutcome::Resolve,
        text: "   ".to_string(),
    });

    ReducerTest::new(TicketListReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(TicketListAction::SubmitReply)
        .then_state(|state| {
            assert!(state.reply_draft.is_some());
            assert!(!state.replying);
            assert!(matches!(state.error, Some(TicketError::Validation(_))));
        })
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn submitting_a_reply_dispatches_the_transition() {
    let ticket = pending_ticket();
    let mut state = state_with_page(vec![ticket.clone()], 1, 1);
    state.reply_draft = Some(ReplyDraft {
        ticket_id: ticket.id,
        outcome: ReplyOutcome::Resolve,
        text: "restarted the encoder".to_string(),
    });

    ReducerTest::new(TicketListReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(TicketListAction::SubmitReply)
        .then_state(|state| {
            assert!(state.replying);
            assert!(state.error.is_none());
        })
        .then_effects(assertions::assert_has_future_effect)
        .run();
}

#[test]
fn reply_confirmation_patches_the_visible_page() {
    let ticket = pending_ticket();
    let ticket_id = ticket.id;
    let mut state = state_with_page(vec![ticket.clone()], 1, 1);
    state.replying = true;
    state.reply_draft = Some(ReplyDraft {
        ticket_id,
        outcome: ReplyOutcome::Resolve,
        text: "done".to_string(),
    });

    let mut updated = ticket;
    updated.status = TicketStatus::Resolved;
    updated.qaqc_reply = Some("done".to_string());

    ReducerTest::new(TicketListReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(TicketListAction::ReplyConfirmed(updated))
        .then_state(move |state| {
            assert!(!state.replying);
            assert!(state.reply_draft.is_none());
            let visible = state.visible_ticket(ticket_id).unwrap();
            assert_eq!(visible.status, TicketStatus::Resolved);
            assert_eq!(visible.qaqc_reply.as_deref(), Some("done"));
        })
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn reply_confirmation_outside_the_filter_reloads() {
    let ticket = pending_ticket();
    let mut state = state_with_page(vec![ticket.clone()], 1, 1);
    state.status = StatusFilter::Only(TicketStatus::Pending);
    state.replying = true;

    let mut updated = ticket;
    updated.status = TicketStatus::Resolved;

    ReducerTest::new(TicketListReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(TicketListAction::ReplyConfirmed(updated))
        .then_state(|state| assert!(state.loading))
        .then_effects(assertions::assert_has_future_effect)
        .run();
}

#[test]
fn transport_failure_preserves_the_reply_draft() {
    let ticket = pending_ticket();
    let ticket_id = ticket.id;
    let mut state = state_with_page(vec![ticket], 1, 1);
    state.replying = true;
    state.reply_draft = Some(ReplyDraft {
        ticket_id,
        outcome: ReplyOutcome::Resolve,
        text: "long careful answer".to_string(),
    });

    ReducerTest::new(TicketListReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(TicketListAction::ReplyFailed {
            ticket_id,
            error: TicketError::transport("connection reset"),
        })
        .then_state(|state| {
            assert!(!state.replying);
            assert_eq!(
                state.reply_draft.as_ref().unwrap().text,
                "long careful answer"
            );
            assert!(matches!(state.error, Some(TicketError::Transport(_))));
        })
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn conflict_drops_the_draft_and_refreshes() {
    let ticket = pending_ticket();
    let ticket_id = ticket.id;
    let mut state = state_with_page(vec![ticket], 1, 1);
    state.replying = true;
    state.reply_draft = Some(ReplyDraft {
        ticket_id,
        outcome: ReplyOutcome::Resolve,
        text: "too late".to_string(),
    });

    ReducerTest::new(TicketListReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(TicketListAction::ReplyFailed {
            ticket_id,
            error: TicketError::Conflict(ticket_id),
        })
        .then_state(|state| {
            assert!(state.reply_draft.is_none());
            assert!(state.loading);
            assert!(matches!(state.error, Some(TicketError::Conflict(_))));
        })
        .then_effects(assertions::assert_has_future_effect)
        .run();
}

#[test]
fn cancel_reply_discards_the_draft() {
    let ticket = pending_ticket();
    let mut state = state_with_page(vec![ticket.clone()], 1, 1);
    state.reply_draft = Some(ReplyDraft {
        ticket_id: ticket.id,
        outcome: ReplyOutcome::Reject,
        text: "draft".to_string(),
    });

    ReducerTest::new(TicketListReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(TicketListAction::CancelReply)
        .then_state(|state| assert!(state.reply_draft.is_none()))
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn dismiss_error_clears_it() {
    let mut state = TicketListState::new(Scope::All, 6);
    state.error = Some(TicketError::transport("gone"));

    ReducerTest::new(TicketListReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(TicketListAction::DismissError)
        .then_state(|state| assert!(state.error.is_none()))
        .then_effects(assertions::assert_no_effects)
        .run();
}
