//! Current-user endpoint.

use axum::{Extension, Json};

use storefront_core::models::auth::IdentityClaim;

use crate::middleware::auth::AuthenticatedUser;

/// `GET /api/user/me`: the identity carried by the caller's token.
pub async fn me_handler(Extension(user): Extension<AuthenticatedUser>) -> Json<IdentityClaim> {
    Json(user.0)
}
