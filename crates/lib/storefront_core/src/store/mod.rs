//! Credential and catalogue stores.
//!
//! The HTTP layer talks to persistence only through [`UserStore`] and
//! [`ProductStore`]. Two backends exist: Postgres ([`postgres`]) and an
//! in-process map ([`memory`]) used for tests and ephemeral runs.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::auth::{NewUser, User, UserWithPassword};
use crate::models::product::{NewProduct, Product, ProductPatch};

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated (e.g. duplicate email).
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// User identity records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user (with password hash) by exact email.
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserWithPassword>>;

    /// Insert a user. Fails with [`StoreError::Conflict`] if the email is taken.
    async fn insert(&self, user: NewUser) -> StoreResult<User>;
}

/// Product catalogue.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products, newest first.
    async fn list(&self) -> StoreResult<Vec<Product>>;

    async fn get(&self, id: Uuid) -> StoreResult<Option<Product>>;

    async fn create(&self, product: NewProduct) -> StoreResult<Product>;

    /// Apply a partial update. `None` if the product does not exist.
    async fn update(&self, id: Uuid, patch: ProductPatch) -> StoreResult<Option<Product>>;

    /// Delete a product. `false` if it did not exist.
    async fn delete(&self, id: Uuid) -> StoreResult<bool>;

    /// Record the URL of the product image. `None` if the product does not exist.
    async fn set_image_url(&self, id: Uuid, url: &str) -> StoreResult<Option<Product>>;
}
