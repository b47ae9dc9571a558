//! Product catalogue operations.

use tracing::info;
use uuid::Uuid;

use storefront_core::ids::parse_id;
use storefront_core::models::auth::IdentityClaim;
use storefront_core::models::product::{NewProduct, Product, ProductPatch};
use storefront_core::store::ProductStore;

use crate::error::{AppError, AppResult};
use crate::models::{CreateProductRequest, UpdateProductRequest};

pub const PRODUCT_NOT_FOUND: &str = "Product not found";

/// Parse a path id. Anything that is not a hyphenated UUID cannot name a product.
pub fn parse_product_id(raw: &str) -> AppResult<Uuid> {
    parse_id(raw).ok_or_else(not_found)
}

fn not_found() -> AppError {
    AppError::NotFound(PRODUCT_NOT_FOUND.into())
}

/// All products, newest first.
pub async fn list(products: &dyn ProductStore) -> AppResult<Vec<Product>> {
    Ok(products.list().await?)
}

pub async fn get(products: &dyn ProductStore, id: Uuid) -> AppResult<Product> {
    products.get(id).await?.ok_or_else(not_found)
}

/// Create a product owned by the caller.
pub async fn create(
    products: &dyn ProductStore,
    owner: &IdentityClaim,
    request: CreateProductRequest,
) -> AppResult<Product> {
    // Validation guarantees a price; the fallback only guards direct callers.
    let price = request
        .price
        .ok_or_else(|| AppError::BadRequest("Price must be a number".into()))?;
    let product = products
        .create(NewProduct {
            name: request.name.trim().to_string(),
            price,
            description: request.description,
            owner_id: owner.user_id(),
        })
        .await?;
    info!(product_id = %product.id, owner = %owner.subject_id, "product created");
    Ok(product)
}

/// Apply the given fields. An empty update returns the product untouched.
pub async fn update(
    products: &dyn ProductStore,
    id: Uuid,
    request: UpdateProductRequest,
) -> AppResult<Product> {
    let patch = ProductPatch {
        name: request.name.map(|n| n.trim().to_string()),
        price: request.price,
        description: request.description,
    };
    if patch.is_empty() {
        return get(products, id).await;
    }
    let product = products.update(id, patch).await?.ok_or_else(not_found)?;
    info!(product_id = %product.id, "product updated");
    Ok(product)
}

pub async fn delete(products: &dyn ProductStore, id: Uuid) -> AppResult<()> {
    if !products.delete(id).await? {
        return Err(not_found());
    }
    info!(product_id = %id, "product deleted");
    Ok(())
}
