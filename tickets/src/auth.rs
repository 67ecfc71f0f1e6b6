//! Credential handling for ticket operations.
//!
//! The original pages read a globally stored session token ad hoc from
//! every call site. Here the credential is behind a single injected
//! [`CredentialProvider`], passed into the submission service, the query
//! engine, and the lifecycle - services fail fast with
//! [`TicketError::Auth`] before issuing any request when no credential is
//! available.

use crate::error::TicketError;
use crate::types::UserId;

/// Platform role of an authenticated actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// A learner; may submit tickets and list their own
    Customer,
    /// A course mentor; may submit tickets and list their own
    Mentor,
    /// A QAQC reviewer; may list all tickets and transition their status
    Qaqc,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Customer => "customer",
            Self::Mentor => "mentor",
            Self::Qaqc => "qaqc",
        };
        write!(f, "{s}")
    }
}

/// A validated session credential.
///
/// Carries the bearer secret for the wire plus the identity claims the
/// client needs for scoping decisions.
#[derive(Clone)]
pub struct AuthToken {
    secret: String,
    actor_id: UserId,
    role: Role,
}

impl AuthToken {
    /// Create a token from its parts.
    #[must_use]
    pub fn new(secret: impl Into<String>, actor_id: UserId, role: Role) -> Self {
        Self {
            secret: secret.into(),
            actor_id,
            role,
        }
    }

    /// The bearer secret sent on the wire.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// The authenticated actor's id.
    #[must_use]
    pub const fn actor_id(&self) -> UserId {
        self.actor_id
    }

    /// The authenticated actor's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }
}

// Keep the secret out of logs.
impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthToken")
            .field("actor_id", &self.actor_id)
            .field("role", &self.role)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Source of the current session credential.
///
/// "No token" is an [`TicketError::Auth`] precondition failure; the session
/// storage mechanics (and the redirect-to-login that follows) live outside
/// this subsystem.
pub trait CredentialProvider: Send + Sync {
    /// The current credential, or `Auth` when none is available.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::Auth`] when no valid credential exists.
    fn credentials(&self) -> Result<AuthToken, TicketError>;
}

/// A provider holding one fixed credential (one per page session).
#[derive(Clone)]
pub struct StaticCredentials {
    token: AuthToken,
}

impl StaticCredentials {
    /// Wrap a fixed token.
    #[must_use]
    pub const fn new(token: AuthToken) -> Self {
        Self { token }
    }
}

impl CredentialProvider for StaticCredentials {
    fn credentials(&self) -> Result<AuthToken, TicketError> {
        Ok(self.token.clone())
    }
}

/// A provider with no session - every operation fails with `Auth`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredentials;

impl CredentialProvider for NoCredentials {
    fn credentials(&self) -> Result<AuthToken, TicketError> {
        Err(TicketError::auth("no session token"))
    }
}
