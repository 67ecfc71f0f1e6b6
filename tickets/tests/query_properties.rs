//! Property tests for the query layer.

#![allow(clippy::unwrap_used)] // Test code

use coursedesk_tickets::auth::{AuthToken, Role};
use coursedesk_tickets::prelude::*;
use coursedesk_tickets::query::{clamp_page, matches_search};
use coursedesk_tickets::repository::InMemoryTicketRepository;
use proptest::prelude::*;
use std::sync::Arc;

fn arbitrary_ticket() -> impl Strategy<Value = Ticket> {
    ("[a-zA-Z ]{1,24}", "[a-zA-Z ]{1,64}").prop_map(|(title, message)| {
        Ticket::submitted(
            TicketId::new(),
            UserId::new(),
            &TicketDraft::new(title, message),
            chrono::Utc::now(),
        )
    })
}

proptest! {
    /// A clamped page is always a real position: within range when pages
    /// exist, pinned to 1 otherwise.
    #[test]
    fn clamped_page_is_always_in_range(requested in 0u32..1000, total in 0u32..100) {
        let clamped = clamp_page(requested, total);
        if total == 0 {
            prop_assert_eq!(clamped, 1);
        } else {
            prop_assert!(clamped >= 1);
            prop_assert!(clamped <= total);
        }
    }

    /// Any substring of the title matches, regardless of case.
    #[test]
    fn title_substrings_always_match(ticket in arbitrary_ticket(), start in 0usize..10, len in 1usize..8) {
        let title = ticket.title.clone();
        prop_assume!(start < title.len());
        let end = usize::min(start + len, title.len());
        let needle = title[start..end].to_uppercase();
        prop_assume!(!needle.trim().is_empty());

        prop_assert!(matches_search(&ticket, &needle));
    }

    /// The empty search matches everything.
    #[test]
    fn empty_search_matches_everything(ticket in arbitrary_ticket()) {
        prop_assert!(matches_search(&ticket, ""));
    }

    /// A match must actually occur in one of the searchable fields.
    #[test]
    fn matches_are_grounded_in_a_field(ticket in arbitrary_ticket(), needle in "[a-zA-Z]{1,6}") {
        let lowered = needle.to_lowercase();
        let expected = ticket.title.to_lowercase().contains(&lowered)
            || ticket.message.to_lowercase().contains(&lowered)
            || ticket
                .course
                .as_ref()
                .is_some_and(|c| c.title.to_lowercase().contains(&lowered));
        prop_assert_eq!(matches_search(&ticket, &needle), expected);
    }

    /// The own scope never leaks another sender's tickets, whatever the
    /// page geometry.
    #[test]
    fn own_scope_never_leaks(own_count in 0usize..12, other_count in 0usize..12, page in 1u32..6, page_size in 1u32..5) {
        let result: Result<(), TestCaseError> = tokio_test::block_on(async {
            let repo = Arc::new(InMemoryTicketRepository::new());
            let owner = AuthToken::new("tok", UserId::new(), Role::Customer);
            let other = AuthToken::new("tok2", UserId::new(), Role::Customer);

            for i in 0..own_count {
                repo.submit(&owner, &TicketDraft::new(format!("own {i}"), "m"))
                    .await
                    .unwrap();
            }
            for i in 0..other_count {
                repo.submit(&other, &TicketDraft::new(format!("other {i}"), "m"))
                    .await
                    .unwrap();
            }

            let request = PageRequest {
                page,
                page_size,
                search: None,
                status: StatusFilter::All,
            };
            let loaded = repo
                .list(&owner, Scope::Own(owner.actor_id()), &request)
                .await
                .unwrap();

            prop_assert_eq!(loaded.total_items, own_count as u64);
            prop_assert!(loaded.items.iter().all(|t| t.sender_id == owner.actor_id()));
            prop_assert!(loaded.items.len() <= page_size as usize);
            Ok(())
        });
        result?;
    }

    /// Page arithmetic: every item appears on exactly one page and the
    /// page count covers the collection.
    #[test]
    fn pages_partition_the_collection(count in 0usize..20, page_size in 1u32..5) {
        let result: Result<(), TestCaseError> = tokio_test::block_on(async {
            let repo = Arc::new(InMemoryTicketRepository::new());
            let owner = AuthToken::new("tok", UserId::new(), Role::Customer);
            for i in 0..count {
                repo.submit(&owner, &TicketDraft::new(format!("t{i}"), "m"))
                    .await
                    .unwrap();
            }

            let first = repo
                .list(&owner, Scope::Own(owner.actor_id()), &PageRequest::first(page_size))
                .await
                .unwrap();
            prop_assert_eq!(
                u64::from(first.total_pages),
                (count as u64).div_ceil(u64::from(page_size))
            );

            let mut seen = std::collections::HashSet::new();
            for page in 1..=first.total_pages.max(1) {
                let request = PageRequest {
                    page,
                    page_size,
                    search: None,
                    status: StatusFilter::All,
                };
                let loaded = repo
                    .list(&owner, Scope::Own(owner.actor_id()), &request)
                    .await
                    .unwrap();
                for ticket in &loaded.items {
                    prop_assert!(seen.insert(ticket.id), "ticket appeared on two pages");
                }
            }
            prop_assert_eq!(seen.len(), count);
            Ok(())
        });
        result?;
    }
}
