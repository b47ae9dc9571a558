//! Auth gate: Bearer token extraction, verification, and identity attachment.
//!
//! Per request the gate moves through three steps:
//!
//! 1. **Extract** the `Authorization: Bearer <token>` credential, or reject
//!    with [`AuthRejection::NoToken`].
//! 2. **Verify** it with the [`TokenCodec`]: an expired token is
//!    [`AuthRejection::Expired`], anything else that fails is
//!    [`AuthRejection::Invalid`].
//! 3. **Attach** the decoded claim to the request as [`AuthenticatedUser`]
//!    and hand over to the next stage.
//!
//! [`authenticate`] performs steps 1 and 2 and returns a [`Verdict`];
//! [`require_auth`] is the axum middleware that threads that verdict.

use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, StatusCode, header::AUTHORIZATION, header::WWW_AUTHENTICATE},
    middleware::Next,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::warn;

use storefront_core::auth::{TokenCodec, TokenError};
use storefront_core::models::auth::IdentityClaim;

use crate::AppState;
use crate::models::ErrorResponse;

/// Verified identity stored in request extensions for downstream handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub IdentityClaim);

/// Why the gate refused a request. Every variant is a 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthRejection {
    #[error("Access denied. No token provided.")]
    NoToken,

    #[error("Token expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,
}

impl AuthRejection {
    /// Short label used in logs.
    pub fn classification(&self) -> &'static str {
        match self {
            AuthRejection::NoToken => "no_token",
            AuthRejection::Expired => "expired",
            AuthRejection::Invalid => "invalid",
        }
    }
}

impl From<&TokenError> for AuthRejection {
    fn from(e: &TokenError) -> Self {
        match e {
            TokenError::Expired => AuthRejection::Expired,
            TokenError::SignatureInvalid | TokenError::Malformed(_) | TokenError::Encode(_) => {
                AuthRejection::Invalid
            }
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let mut response = (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new(self.to_string())),
        )
            .into_response();
        response
            .headers_mut()
            .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        response
    }
}

/// Outcome of running the gate over one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accept(AuthenticatedUser),
    Reject(AuthRejection),
}

/// Extract the token from `Authorization: Bearer <token>`.
///
/// The scheme is matched case-insensitively and must be followed by exactly
/// one space and a non-empty token containing no whitespace.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    if token.is_empty() || token.contains(char::is_whitespace) {
        return None;
    }
    Some(token)
}

/// Run extract + verify over the request headers.
pub fn authenticate(headers: &HeaderMap, codec: &TokenCodec) -> Verdict {
    let Some(token) = bearer_token(headers) else {
        warn!(classification = AuthRejection::NoToken.classification(), "no bearer token");
        return Verdict::Reject(AuthRejection::NoToken);
    };

    match codec.verify(token) {
        Ok(claim) => Verdict::Accept(AuthenticatedUser(claim)),
        Err(e) => {
            let rejection = AuthRejection::from(&e);
            warn!(
                classification = rejection.classification(),
                error = %e,
                "token verification failed"
            );
            Verdict::Reject(rejection)
        }
    }
}

/// Axum middleware guarding protected routes.
///
/// On accept, inserts [`AuthenticatedUser`] into request extensions and runs
/// the next stage. On reject, responds 401 without calling it.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthRejection> {
    match authenticate(request.headers(), &state.tokens) {
        Verdict::Accept(user) => {
            request.extensions_mut().insert(user);
            Ok(next.run(request).await)
        }
        Verdict::Reject(rejection) => Err(rejection),
    }
}
