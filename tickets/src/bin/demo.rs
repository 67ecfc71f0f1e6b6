//! End-to-end demo of the ticket subsystem against the in-memory store.
//!
//! Walks the full round trip: a customer submits a ticket and watches it
//! in their view, a QAQC reviewer finds it in the privileged view and
//! resolves it, and the customer sees the reply with the reviewer's name.

use coursedesk_core::environment::SystemClock;
use coursedesk_tickets::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SETTLE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "demo=info,coursedesk_tickets=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ticket subsystem demo");

    let config = Config::from_env()?;
    let repo = Arc::new(InMemoryTicketRepository::new());

    let customer_id = UserId::new();
    let reviewer_id = UserId::new();
    repo.register_user(customer_id, "Casey Customer").await;
    repo.register_user(reviewer_id, "Dana Reviewer").await;

    let customer_creds = Arc::new(StaticCredentials::new(AuthToken::new(
        "customer-session",
        customer_id,
        Role::Customer,
    )));
    let reviewer_creds = Arc::new(StaticCredentials::new(AuthToken::new(
        "qaqc-session",
        reviewer_id,
        Role::Qaqc,
    )));

    // Customer submits a ticket
    let submission = TicketSubmissionService::new(repo.clone(), customer_creds.clone());
    let ticket = submission
        .submit(
            &TicketDraft::new(
                "Video will not play",
                "Lesson 3 of the async course stalls at 0:00",
            ),
        )
        .await?;
    info!(ticket_id = %ticket.id, status = %ticket.status, "ticket submitted");

    // Customer view shows the pending ticket
    let debounce = Duration::from_millis(config.view.search_debounce_ms);
    let customer_env = ProductionTicketListEnvironment::from_repository(
        repo.clone(),
        customer_creds,
        Arc::new(SystemClock),
        debounce,
    );
    let customer_view = RoleView::customer(customer_env, customer_id, config.view.customer_page_size);

    customer_view
        .send_and_settle(TicketListAction::Refresh, SETTLE)
        .await?;
    let visible = customer_view
        .state(|s| s.visible.clone())
        .await
        .ok_or_else(|| anyhow::anyhow!("customer view did not load"))?;
    info!(
        count = visible.items.len(),
        total = visible.total_items,
        "customer view loaded"
    );

    // QAQC view sees every ticket and resolves this one
    let reviewer_env = ProductionTicketListEnvironment::from_repository(
        repo.clone(),
        reviewer_creds,
        Arc::new(SystemClock),
        debounce,
    );
    let qaqc_view = RoleView::qaqc(reviewer_env, config.view.qaqc_page_size);

    qaqc_view
        .send_and_settle(TicketListAction::Refresh, SETTLE)
        .await?;
    qaqc_view
        .send_and_settle(
            TicketListAction::BeginReply {
                ticket_id: ticket.id,
                outcome: ReplyOutcome::Resolve,
            },
            SETTLE,
        )
        .await?;
    qaqc_view
        .send_and_settle(
            TicketListAction::ReplyTextChanged("Re-encoded the lesson, plays now.".to_string()),
            SETTLE,
        )
        .await?;
    qaqc_view
        .send_and_settle(TicketListAction::SubmitReply, SETTLE)
        .await?;

    let resolved = qaqc_view
        .state(|s| s.visible_ticket(ticket.id).cloned())
        .await
        .ok_or_else(|| anyhow::anyhow!("ticket disappeared from qaqc view"))?;
    info!(status = %resolved.status, "qaqc reviewer resolved the ticket");

    // Customer refreshes and sees the reply with the reviewer's name
    customer_view
        .send_and_settle(TicketListAction::Refresh, SETTLE)
        .await?;
    let after = customer_view
        .state(|s| s.visible_ticket(ticket.id).cloned())
        .await
        .ok_or_else(|| anyhow::anyhow!("ticket disappeared from customer view"))?;
    info!(
        status = %after.status,
        reply = after.qaqc_reply.as_deref().unwrap_or(""),
        replied_by = after.replied_by_name.as_deref().unwrap_or(""),
        "customer sees the resolution"
    );

    customer_view.shutdown(SETTLE).await?;
    qaqc_view.shutdown(SETTLE).await?;
    info!("demo complete");
    Ok(())
}
