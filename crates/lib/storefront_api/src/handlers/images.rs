//! Product image upload handler.

use axum::extract::{Multipart, Path, State};
use axum::{Extension, Json};

use storefront_core::models::product::Product;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::services::{images, products};

/// `POST /api/products/{id}/image`: multipart upload, field `image`.
pub async fn upload_product_image_handler(
    State(state): State<AppState>,
    Extension(_user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> AppResult<Json<Product>> {
    let id = products::parse_product_id(&id)?;
    let upload = images::read_image_field(&mut multipart, state.config.max_upload_bytes).await?;
    let product = images::attach_image(
        state.products.as_ref(),
        state.images.as_ref(),
        id,
        upload,
    )
    .await?;
    Ok(Json(product))
}
