//! Product image upload.

use axum::extract::Multipart;
use bytes::Bytes;
use tracing::{debug, info};
use uuid::Uuid;

use storefront_core::images::{ImageStore, image_key};
use storefront_core::models::product::Product;
use storefront_core::store::ProductStore;

use crate::error::{AppError, AppResult};
use crate::services::products;

/// Multipart field carrying the image.
pub const IMAGE_FIELD: &str = "image";

/// An image read from a multipart body.
#[derive(Debug)]
pub struct UploadedImage {
    pub content_type: String,
    pub bytes: Bytes,
}

/// Read the `image` field, skipping any other fields.
pub async fn read_image_field(
    multipart: &mut Multipart,
    max_bytes: usize,
) -> AppResult<UploadedImage> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            debug!(field = ?field.name(), "skipping multipart field");
            continue;
        }
        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let bytes = field.bytes().await?;
        if bytes.is_empty() {
            return Err(AppError::BadRequest("Uploaded image is empty".into()));
        }
        if bytes.len() > max_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "Image exceeds the {max_bytes} byte limit"
            )));
        }
        return Ok(UploadedImage {
            content_type,
            bytes,
        });
    }
    Err(AppError::BadRequest(format!(
        "No '{IMAGE_FIELD}' file provided"
    )))
}

/// Store the image and point the product at it.
pub async fn attach_image(
    catalogue: &dyn ProductStore,
    images: &dyn ImageStore,
    id: Uuid,
    upload: UploadedImage,
) -> AppResult<Product> {
    // Fail fast on unknown products before writing anything.
    products::get(catalogue, id).await?;

    let key = image_key(id, &upload.content_type, &upload.bytes)?;
    let size = upload.bytes.len();
    let url = images.put(&key, &upload.content_type, upload.bytes).await?;

    let product = catalogue
        .set_image_url(id, &url)
        .await?
        .ok_or_else(|| AppError::NotFound(products::PRODUCT_NOT_FOUND.into()))?;
    info!(product_id = %id, size, url = %url, "product image stored");
    Ok(product)
}
