//! Registration and login handlers. Both are public routes.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::AppState;
use crate::error::AppResult;
use crate::extract::ValidateJson;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest};
use crate::services::auth;

/// `POST /api/auth/register`: create an account and return a token.
pub async fn register_handler(
    State(state): State<AppState>,
    ValidateJson(body): ValidateJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let resp = auth::register(state.users.as_ref(), &state.tokens, body).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

/// `POST /api/auth/login`: authenticate with email + password.
pub async fn login_handler(
    State(state): State<AppState>,
    ValidateJson(body): ValidateJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let resp = auth::login(state.users.as_ref(), &state.tokens, body).await?;
    Ok(Json(resp))
}
