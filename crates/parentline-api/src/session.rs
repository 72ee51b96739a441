//! Authenticated session context.

use std::fmt;

use crate::model::{Role, UserId};

/// The authenticated account and its bearer token.
///
/// Issued by the external authentication service and passed explicitly into
/// every component that talks to the services.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    user_id: UserId,
    role: Role,
    token: String,
}

impl Session {
    /// Creates a session.
    #[must_use]
    pub fn new(user_id: impl Into<UserId>, role: Role, token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role,
            token: token.into(),
        }
    }

    /// Returns the local account id.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns the local account role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the bearer token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the `Authorization` header value.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

// Keeps the token out of logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("role", &self.role)
            .field("token", &"<redacted>")
            .finish()
    }
}
