//! Product CRUD handlers.
//!
//! Listing and lookup are public; create, update and delete sit behind the
//! auth gate.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use storefront_core::models::product::Product;

use crate::AppState;
use crate::error::AppResult;
use crate::extract::ValidateJson;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{CreateProductRequest, MessageResponse, UpdateProductRequest};
use crate::services::products;

/// `GET /api/products`: all products, newest first.
pub async fn list_products_handler(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(products::list(state.products.as_ref()).await?))
}

/// `GET /api/products/{id}`
pub async fn get_product_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let id = products::parse_product_id(&id)?;
    Ok(Json(products::get(state.products.as_ref(), id).await?))
}

/// `POST /api/products`: create a product owned by the caller.
pub async fn create_product_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidateJson(body): ValidateJson<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let product = products::create(state.products.as_ref(), &user.0, body).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT /api/products/{id}`: partial update.
pub async fn update_product_handler(
    State(state): State<AppState>,
    Extension(_user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidateJson(body): ValidateJson<UpdateProductRequest>,
) -> AppResult<Json<Product>> {
    let id = products::parse_product_id(&id)?;
    Ok(Json(products::update(state.products.as_ref(), id, body).await?))
}

/// `DELETE /api/products/{id}`
pub async fn delete_product_handler(
    State(state): State<AppState>,
    Extension(_user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = products::parse_product_id(&id)?;
    products::delete(state.products.as_ref(), id).await?;
    Ok(Json(MessageResponse::new("Product removed successfully")))
}
