//! Error taxonomy for the ticket subsystem.
//!
//! Four categories, each with a distinct handling policy at the call site:
//!
//! - [`TicketError::Validation`]: bad input, user-correctable, shown inline
//! - [`TicketError::Auth`]: missing/expired credential, redirect to login
//! - [`TicketError::Conflict`]: transition attempted on a non-pending
//!   ticket; shown as a message and the list is refreshed
//! - [`TicketError::Transport`]: network/backend failure, retryable, shown
//!   as a dismissible notification
//!
//! Errors are `Clone` because they travel inside view actions (a failed
//! request surfaces as a `...Failed` action carrying its error).

use crate::types::TicketId;
use thiserror::Error;

/// Failure of a ticket operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TicketError {
    /// Bad input; the caller can correct and retry.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Missing, expired, or insufficient credential.
    #[error("not authorized: {0}")]
    Auth(String),

    /// A status transition was attempted on a ticket that is no longer
    /// pending. The cached list is stale; refresh it.
    #[error("ticket {0} is no longer pending")]
    Conflict(TicketId),

    /// Network or backend failure. The operation had no observable effect
    /// and is safe to retry.
    #[error("transport failure: {0}")]
    Transport(String),
}

impl TicketError {
    /// Build a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Build an authorization error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Build a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Whether retrying the failed operation can succeed without any other
    /// change. Only transport failures qualify.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
