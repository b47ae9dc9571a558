//! Authentication logic.
//!
//! Password hashing, the signed identity token codec, and the signing secret
//! lookup shared by the API server.

pub mod password;
pub mod secret;
pub mod token;

use thiserror::Error;

pub use token::{TokenCodec, TokenError};

/// Authentication errors raised while issuing credentials.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    CredentialError,

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),
}
