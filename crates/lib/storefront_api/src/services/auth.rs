//! Registration and login: credential checks and token issuance.

use tracing::info;

use storefront_core::auth::password::{hash_password, verify_password};
use storefront_core::auth::{AuthError, TokenCodec};
use storefront_core::models::auth::{NewUser, User};
use storefront_core::store::{StoreError, UserStore};

use crate::error::{AppError, AppResult};
use crate::models::{AuthResponse, AuthUser, LoginRequest, RegisterRequest};

const USER_EXISTS: &str = "User already exists";

/// Issue a token for `user` and wrap it in the response body.
fn build_auth_response(message: &str, user: &User, tokens: &TokenCodec) -> AppResult<AuthResponse> {
    let token = tokens.issue(&user.identity()).map_err(AuthError::from)?;
    Ok(AuthResponse {
        message: message.to_string(),
        token,
        token_type: "Bearer".to_string(),
        expires_in: tokens.ttl().num_seconds(),
        user: AuthUser::from(user),
    })
}

/// Register a new account and log it in.
pub async fn register(
    users: &dyn UserStore,
    tokens: &TokenCodec,
    request: RegisterRequest,
) -> AppResult<AuthResponse> {
    let email = request.email.trim().to_string();

    if users.find_by_email(&email).await?.is_some() {
        return Err(AppError::BadRequest(USER_EXISTS.into()));
    }

    let password_hash = hash_password(&request.password)?;
    let user = users
        .insert(NewUser {
            name: request.name.trim().to_string(),
            email,
            password_hash,
        })
        .await
        .map_err(|e| match e {
            // Lost a race with a concurrent registration for the same email.
            StoreError::Conflict(_) => AppError::BadRequest(USER_EXISTS.into()),
            other => other.into(),
        })?;

    info!(user_id = %user.id, "user registered");
    build_auth_response("User registered successfully", &user, tokens)
}

/// Authenticate with email + password.
///
/// Unknown email and wrong password produce the same error.
pub async fn login(
    users: &dyn UserStore,
    tokens: &TokenCodec,
    request: LoginRequest,
) -> AppResult<AuthResponse> {
    let email = request.email.trim();

    let Some(record) = users.find_by_email(email).await? else {
        return Err(AuthError::CredentialError.into());
    };
    if !verify_password(&request.password, &record.password_hash)? {
        return Err(AuthError::CredentialError.into());
    }

    info!(user_id = %record.user.id, "user logged in");
    build_auth_response("Login successful", &record.user, tokens)
}
