//! JSON extractor that runs `validator` rules after deserialization.

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use tracing::debug;
use validator::Validate;

use crate::error::AppError;

/// Deserializes a JSON body and validates it.
///
/// Malformed JSON is a 400 with the parser message; rule violations are a
/// 400 listing each failing field.
#[must_use]
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidateJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = <Json<T> as FromRequest<S>>::from_request(req, state).await?;
        if let Err(errors) = data.validate() {
            debug!(errors = ?errors.field_errors(), "request validation failed");
            return Err(errors.into());
        }
        Ok(Self(data))
    }
}
