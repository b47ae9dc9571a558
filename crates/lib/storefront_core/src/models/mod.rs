//! Domain models.
//!
//! These are internal domain models, distinct from the request/response
//! shapes in `storefront_api::models`.

pub mod auth;
pub mod product;
