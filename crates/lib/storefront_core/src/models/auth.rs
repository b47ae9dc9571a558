//! Identity and credential models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity asserted by a token: who the bearer is.
///
/// Immutable once issued. Serialised as `{"id", "email"}` when echoed back
/// to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaim {
    #[serde(rename = "id")]
    pub subject_id: String,
    pub email: String,
}

impl IdentityClaim {
    pub fn new(subject_id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            email: email.into(),
        }
    }

    /// Parse the subject as a user id, if it is one.
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.subject_id).ok()
    }
}

/// JWT claims embedded in issued tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject, the user ID (registered `sub` claim).
    pub sub: String,
    pub email: String,
    /// Expiry (unix timestamp).
    pub exp: i64,
    /// Issued at (unix timestamp).
    pub iat: i64,
}

impl From<TokenClaims> for IdentityClaim {
    fn from(claims: TokenClaims) -> Self {
        Self {
            subject_id: claims.sub,
            email: claims.email,
        }
    }
}

/// Registered user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The identity this user is issued tokens for.
    pub fn identity(&self) -> IdentityClaim {
        IdentityClaim::new(self.id.to_string(), self.email.clone())
    }
}

/// User with password hash (for internal auth flows only).
#[derive(Debug, Clone)]
pub struct UserWithPassword {
    pub user: User,
    pub password_hash: String,
}

/// Insert payload for a new user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}
