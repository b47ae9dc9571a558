//! # storefront_api
//!
//! HTTP API library for Storefront: auth, product catalogue, image upload.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use chrono::Duration;
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use storefront_core::auth::TokenCodec;
use storefront_core::auth::token::DEFAULT_TOKEN_TTL_SECS;
use storefront_core::images::{ImageStore, LocalImageStore, MemoryImageStore};
use storefront_core::store::memory::{MemoryProductStore, MemoryUserStore};
use storefront_core::store::postgres::{PgProductStore, PgUserStore};
use storefront_core::store::{ProductStore, UserStore};

use crate::config::ApiConfig;
use crate::handlers::{auth, health, images, products, user};

/// Extra room on top of the image limit for multipart framing.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub products: Arc<dyn ProductStore>,
    pub images: Arc<dyn ImageStore>,
    /// Token codec bound to the configured secret.
    pub tokens: TokenCodec,
    /// API configuration.
    pub config: ApiConfig,
}

impl AppState {
    /// Assemble state from explicit stores. The token codec is built from
    /// `config.jwt_secret` here and nowhere else.
    pub fn new(
        config: ApiConfig,
        users: Arc<dyn UserStore>,
        products: Arc<dyn ProductStore>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        let ttl = Duration::try_seconds(config.token_ttl_secs).unwrap_or_else(|| {
            tracing::warn!(value = config.token_ttl_secs, "token lifetime out of range");
            Duration::seconds(DEFAULT_TOKEN_TTL_SECS)
        });
        let tokens = TokenCodec::new(config.jwt_secret.as_bytes(), ttl);
        Self {
            users,
            products,
            images,
            tokens,
            config,
        }
    }

    /// State on Postgres stores with images on local disk.
    pub fn postgres(config: ApiConfig, pool: PgPool) -> Self {
        let images = LocalImageStore::new(&config.upload_dir, config.public_base_url.clone());
        Self::new(
            config,
            Arc::new(PgUserStore::new(pool.clone())),
            Arc::new(PgProductStore::new(pool)),
            Arc::new(images),
        )
    }

    /// State on in-memory stores. Nothing survives a restart.
    pub fn in_memory(config: ApiConfig) -> Self {
        Self::new(
            config,
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemoryProductStore::new()),
            Arc::new(MemoryImageStore::new()),
        )
    }
}

/// Run embedded database migrations.
///
/// Delegates to `storefront_core::migrate::migrate()` which owns the migration files.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    storefront_core::migrate::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new()
        .route(routes::ROOT, get(health::root))
        .route(routes::GET_API_HEALTH, get(health::health))
        .route(routes::POST_AUTH_REGISTER, post(auth::register_handler))
        .route(routes::POST_AUTH_LOGIN, post(auth::login_handler))
        .route(routes::PRODUCTS, get(products::list_products_handler))
        .route(routes::PRODUCTS_ID, get(products::get_product_handler));

    // Protected handlers (require a valid bearer token). The gate wraps each
    // handler rather than the path, so unsupported methods still get 405.
    let gate = axum::middleware::from_fn_with_state(state.clone(), middleware::auth::require_auth);
    let protected = Router::new()
        .route(routes::GET_USER_ME, get(user::me_handler).route_layer(gate.clone()))
        .route(
            routes::PRODUCTS,
            post(products::create_product_handler).route_layer(gate.clone()),
        )
        .route(
            routes::PRODUCTS_ID,
            put(products::update_product_handler)
                .delete(products::delete_product_handler)
                .route_layer(gate.clone()),
        )
        .route(
            routes::POST_PRODUCTS_ID_IMAGE,
            post(images::upload_product_image_handler)
                .layer(DefaultBodyLimit::max(
                    state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES,
                ))
                .route_layer(gate),
        );

    let mut app = Router::new().merge(public).merge(protected);

    if let Some(dir) = state.images.served_dir() {
        app = app.nest_service(routes::UPLOADS, ServeDir::new(dir));
    }

    app.layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
