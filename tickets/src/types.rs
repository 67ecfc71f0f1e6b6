//! Core domain types for the ticket subsystem.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a new random id.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id! {
    /// Unique identifier of a ticket, assigned at creation, immutable.
    TicketId
}

entity_id! {
    /// Identifier of a platform actor (customer, mentor, or QAQC reviewer).
    UserId
}

entity_id! {
    /// Identifier of a course in the catalog (external to this subsystem).
    CourseId
}

entity_id! {
    /// Identifier of a class in the catalog (external to this subsystem).
    ClassId
}

/// Ticket status.
///
/// Starts at `Pending`; `Resolved` and `Rejected` are terminal - once
/// entered, the status never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    /// Submitted, awaiting QAQC triage
    Pending,
    /// Triaged and resolved (terminal)
    Resolved,
    /// Triaged and rejected (terminal)
    Rejected,
}

impl TicketStatus {
    /// Whether this status is terminal.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Resolved | Self::Rejected)
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Resolved => "resolved",
            Self::Rejected => "rejected",
        };
        write!(f, "{s}")
    }
}

/// Outcome chosen by the QAQC reviewer when replying to a ticket.
///
/// The status enumeration has always carried `rejected` even though the
/// original reply path only resolved; the outcome is explicit here so both
/// terminal states are reachable through the one triage operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyOutcome {
    /// Close the ticket as resolved
    Resolve,
    /// Close the ticket as rejected
    Reject,
}

impl ReplyOutcome {
    /// The terminal status this outcome transitions the ticket into.
    #[must_use]
    pub const fn terminal_status(self) -> TicketStatus {
        match self {
            Self::Resolve => TicketStatus::Resolved,
            Self::Reject => TicketStatus::Rejected,
        }
    }
}

/// Association to a course, carrying the display title so that search can
/// match against it without a catalog lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRef {
    /// Course id in the catalog
    pub id: CourseId,
    /// Course display title
    pub title: String,
}

/// Association to a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRef {
    /// Class id in the catalog
    pub id: ClassId,
}

/// A support/service ticket.
///
/// `title`, `message`, `sender_id`, and the course/class associations are
/// immutable after creation (there is no edit-ticket operation). The reply
/// fields are populated if and only if the status is terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Unique id, assigned at creation
    pub id: TicketId,
    /// Short summary, non-empty
    pub title: String,
    /// Full description, non-empty
    pub message: String,
    /// The submitting customer or mentor
    pub sender_id: UserId,
    /// Optional course association
    pub course: Option<CourseRef>,
    /// Optional class association
    pub class: Option<ClassRef>,
    /// Current status
    pub status: TicketStatus,
    /// QAQC reply text, set by the triage transition
    pub qaqc_reply: Option<String>,
    /// The QAQC reviewer who triaged the ticket
    pub replied_by: Option<UserId>,
    /// Display name of the reviewer, enriched by the query engine;
    /// degrades to a placeholder when the user lookup fails
    pub replied_by_name: Option<String>,
    /// Creation time, immutable
    pub created_at: DateTime<Utc>,
    /// Overwritten on the triage transition
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    /// Create a freshly submitted, pending ticket.
    #[must_use]
    pub fn submitted(
        id: TicketId,
        sender_id: UserId,
        draft: &TicketDraft,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: draft.title.clone(),
            message: draft.message.clone(),
            sender_id,
            course: draft.course.clone(),
            class: draft.class,
            status: TicketStatus::Pending,
            qaqc_reply: None,
            replied_by: None,
            replied_by_name: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the ticket is still awaiting triage.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.status, TicketStatus::Pending)
    }
}

/// Actor input for a new ticket (title, message, optional associations).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketDraft {
    /// Short summary
    pub title: String,
    /// Full description
    pub message: String,
    /// Optional course association
    pub course: Option<CourseRef>,
    /// Optional class association
    pub class: Option<ClassRef>,
}

impl TicketDraft {
    /// A draft with no course/class association.
    #[must_use]
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            course: None,
            class: None,
        }
    }

    /// Attach a course association.
    #[must_use]
    pub fn with_course(mut self, course: CourseRef) -> Self {
        self.course = Some(course);
        self
    }

    /// Attach a class association.
    #[must_use]
    pub const fn with_class(mut self, class: ClassRef) -> Self {
        self.class = Some(class);
        self
    }

    /// Trim surrounding whitespace from title and message.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.message = self.message.trim().to_string();
        self
    }
}

/// The authorization boundary of a listing query.
///
/// Customers and mentors see only their own tickets; QAQC reviewers see all
/// tickets. This is not a convenience filter - queries must never return
/// tickets outside the scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scope {
    /// Tickets submitted by this actor
    Own(UserId),
    /// All tickets (QAQC only)
    All,
}

/// Status filter for listing queries. `All` disables status filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusFilter {
    /// Retain every status
    #[default]
    All,
    /// Retain only tickets with the given status
    Only(TicketStatus),
}

impl StatusFilter {
    /// Whether a ticket with `status` passes this filter.
    #[must_use]
    pub fn matches(&self, status: TicketStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == status,
        }
    }
}

/// Parameters of one page request against the ticket store.
///
/// Pagination is server-driven: `page` (1-based) and `page_size` map
/// directly onto the backend request. `search` is pushed into the backend
/// query so matches are not limited to the loaded page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Requested page, 1-based
    pub page: u32,
    /// Fixed page size of the requesting role view
    pub page_size: u32,
    /// Optional case-insensitive search text
    pub search: Option<String>,
    /// Status filter
    pub status: StatusFilter,
}

impl PageRequest {
    /// A plain first-page request with no filters.
    #[must_use]
    pub const fn first(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size,
            search: None,
            status: StatusFilter::All,
        }
    }
}

/// An ordered, size-bounded slice of tickets matching a query, plus the
/// navigation metadata reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketPage {
    /// Tickets on this page
    pub items: Vec<Ticket>,
    /// The page these items belong to, 1-based
    pub page: u32,
    /// Page size used for the query
    pub page_size: u32,
    /// Total pages for the query; 0 when there are no matching tickets
    pub total_pages: u32,
    /// Total matching tickets across all pages
    pub total_items: u64,
}
