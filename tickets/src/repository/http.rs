//! HTTP implementation of [`TicketRepository`] against the platform API.
//!
//! This is the only module that knows the wire contract:
//!
//! - `POST   /tickets`              - submit (returns the new ticket id)
//! - `GET    /tickets/my`           - list the actor's own tickets
//! - `GET    /tickets`              - list all tickets (privileged)
//! - `POST   /tickets/{id}/reply`   - conditional triage transition
//! - `GET    /users/{id}`           - user resolution
//!
//! Query parameters: 1-based `page`, fixed `limit`, optional `search` and
//! `status`. Bodies are camelCase JSON. HTTP statuses map onto the domain
//! taxonomy: 400/422 → `Validation`, 401/403 → `Auth`, 409 → `Conflict`,
//! everything else → `Transport`.
//!
//! Transient failures on reads and submission are retried with exponential
//! backoff; replies are never auto-retried (a retry racing a lost success
//! response would surface as a spurious conflict - callers refresh
//! instead).

use crate::auth::AuthToken;
use crate::config::ApiConfig;
use crate::error::TicketError;
use crate::repository::{TicketRepository, UserProfile};
use crate::types::{
    ClassRef, CourseId, CourseRef, PageRequest, ReplyOutcome, Scope, StatusFilter, Ticket,
    TicketDraft, TicketId, TicketPage, TicketStatus, UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use coursedesk_runtime::retry::{RetryPolicy, retry_with_predicate};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// [`TicketRepository`] over the remote platform API.
pub struct HttpTicketRepository {
    http: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl HttpTicketRepository {
    /// Build a client from configuration.
    ///
    /// Every request carries a bounded timeout; expiry surfaces as
    /// `Transport` with no ticket state changed.
    ///
    /// # Errors
    ///
    /// `Transport` when the underlying HTTP client cannot be constructed.
    pub fn new(config: &ApiConfig) -> Result<Self, TicketError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .build()
            .map_err(|e| TicketError::transport(format!("failed to build http client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry: RetryPolicy::builder()
                .max_retries(config.max_retries)
                .initial_delay(Duration::from_millis(200))
                .build(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitBody<'a> {
    title: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    course_id: Option<CourseId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    class_id: Option<crate::types::ClassId>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitResponse {
    ticket_id: TicketId,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyBody<'a> {
    outcome: ReplyOutcome,
    reply: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReplyResponse {
    updated_ticket: TicketWire,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CourseRefWire {
    id: CourseId,
    title: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TicketWire {
    id: TicketId,
    title: String,
    message: String,
    sender_id: UserId,
    course: Option<CourseRefWire>,
    class_id: Option<crate::types::ClassId>,
    status: TicketStatus,
    qaqc_reply: Option<String>,
    replied_by: Option<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TicketWire> for Ticket {
    fn from(wire: TicketWire) -> Self {
        Self {
            id: wire.id,
            title: wire.title,
            message: wire.message,
            sender_id: wire.sender_id,
            course: wire.course.map(|c| CourseRef {
                id: c.id,
                title: c.title,
            }),
            class: wire.class_id.map(|id| ClassRef { id }),
            status: wire.status,
            qaqc_reply: wire.qaqc_reply,
            replied_by: wire.replied_by,
            replied_by_name: None,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        }
    }
}

/// Listing response. The backend reports either `totalPages` directly or a
/// `totalItems` count from which the page count is computed.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageWire {
    items: Vec<TicketWire>,
    page: u32,
    total_pages: Option<u32>,
    total_items: Option<u64>,
}

impl PageWire {
    fn into_page(self, page_size: u32) -> TicketPage {
        let total_items = self
            .total_items
            .unwrap_or_else(|| u64::from(self.total_pages.unwrap_or(0)) * u64::from(page_size));
        let total_pages = self.total_pages.unwrap_or_else(|| {
            if total_items == 0 || page_size == 0 {
                0
            } else {
                u32::try_from(total_items.div_ceil(u64::from(page_size))).unwrap_or(u32::MAX)
            }
        });

        TicketPage {
            items: self.items.into_iter().map(Ticket::from).collect(),
            page: self.page,
            page_size,
            total_pages,
            total_items,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserWire {
    id: UserId,
    full_name: String,
}

// ============================================================================
// Error mapping
// ============================================================================

fn request_error(err: reqwest::Error) -> TicketError {
    if err.is_timeout() {
        TicketError::transport("request timed out")
    } else {
        TicketError::transport(err.to_string())
    }
}

async fn check_status(
    response: reqwest::Response,
    ticket_id: Option<TicketId>,
) -> Result<reqwest::Response, TicketError> {
    use reqwest::StatusCode;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            TicketError::validation(body)
        },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            TicketError::auth(format!("backend rejected credential ({status})"))
        },
        StatusCode::CONFLICT => match ticket_id {
            Some(id) => TicketError::Conflict(id),
            None => TicketError::transport(format!("unexpected conflict: {body}")),
        },
        _ => TicketError::transport(format!("backend returned {status}: {body}")),
    })
}

async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, TicketError> {
    response
        .json::<T>()
        .await
        .map_err(|e| TicketError::transport(format!("malformed response: {e}")))
}

// ============================================================================
// Repository implementation
// ============================================================================

#[async_trait]
impl TicketRepository for HttpTicketRepository {
    #[tracing::instrument(skip(self, token, draft), fields(actor = %token.actor_id()))]
    async fn submit(&self, token: &AuthToken, draft: &TicketDraft) -> Result<Ticket, TicketError> {
        let body = SubmitBody {
            title: &draft.title,
            message: &draft.message,
            course_id: draft.course.as_ref().map(|c| c.id),
            class_id: draft.class.map(|c| c.id),
        };

        let response: SubmitResponse = retry_with_predicate(
            self.retry.clone(),
            || async {
                let response = self
                    .http
                    .post(self.url("/tickets"))
                    .bearer_auth(token.secret())
                    .json(&body)
                    .send()
                    .await
                    .map_err(request_error)?;
                decode(check_status(response, None).await?).await
            },
            TicketError::is_retryable,
        )
        .await?;

        // The creation response carries only the assigned id; the pending
        // record is reconstructed locally from the draft.
        let ticket = Ticket::submitted(response.ticket_id, token.actor_id(), draft, Utc::now());
        tracing::info!(ticket_id = %ticket.id, "ticket submitted");
        Ok(ticket)
    }

    #[tracing::instrument(skip(self, token, request), fields(actor = %token.actor_id(), page = request.page))]
    async fn list(
        &self,
        token: &AuthToken,
        scope: Scope,
        request: &PageRequest,
    ) -> Result<TicketPage, TicketError> {
        let path = match scope {
            Scope::Own(_) => "/tickets/my",
            Scope::All => "/tickets",
        };

        let mut query: Vec<(&str, String)> = vec![
            ("page", request.page.to_string()),
            ("limit", request.page_size.to_string()),
        ];
        if let Some(search) = &request.search {
            query.push(("search", search.clone()));
        }
        if let StatusFilter::Only(status) = request.status {
            query.push(("status", status.to_string()));
        }

        let wire: PageWire = retry_with_predicate(
            self.retry.clone(),
            || async {
                let response = self
                    .http
                    .get(self.url(path))
                    .bearer_auth(token.secret())
                    .query(&query)
                    .send()
                    .await
                    .map_err(request_error)?;
                decode(check_status(response, None).await?).await
            },
            TicketError::is_retryable,
        )
        .await?;

        Ok(wire.into_page(request.page_size))
    }

    #[tracing::instrument(skip(self, token, reply), fields(actor = %token.actor_id(), %ticket_id))]
    async fn reply(
        &self,
        token: &AuthToken,
        ticket_id: TicketId,
        outcome: ReplyOutcome,
        reply: &str,
    ) -> Result<Ticket, TicketError> {
        let body = ReplyBody { outcome, reply };

        // No retry here: the transition is one-shot by design.
        let response = self
            .http
            .post(self.url(&format!("/tickets/{ticket_id}/reply")))
            .bearer_auth(token.secret())
            .json(&body)
            .send()
            .await
            .map_err(request_error)?;
        let decoded: ReplyResponse = decode(check_status(response, Some(ticket_id)).await?).await?;

        tracing::info!(%ticket_id, ?outcome, "ticket triaged");
        Ok(Ticket::from(decoded.updated_ticket))
    }

    async fn resolve_user(&self, user_id: UserId) -> Result<UserProfile, TicketError> {
        let wire: UserWire = retry_with_predicate(
            self.retry.clone(),
            || async {
                let response = self
                    .http
                    .get(self.url(&format!("/users/{user_id}")))
                    .send()
                    .await
                    .map_err(request_error)?;
                decode(check_status(response, None).await?).await
            },
            TicketError::is_retryable,
        )
        .await?;

        Ok(UserProfile {
            id: wire.id,
            full_name: wire.full_name,
        })
    }
}
