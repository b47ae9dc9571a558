//! API server configuration.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use storefront_core::auth::secret::resolve_jwt_secret;
use storefront_core::auth::token::DEFAULT_TOKEN_TTL_SECS;

/// Default request body limit for JSON endpoints: 1 MiB.
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Default upload limit for product images: 5 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Longest accepted token lifetime: 30 days.
pub const MAX_TOKEN_TTL_SECS: i64 = 30 * 24 * 60 * 60;

/// Which store backend the server runs on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageKind {
    Postgres,
    Memory,
}

impl StorageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKind::Postgres => "postgres",
            StorageKind::Memory => "memory",
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Ok(StorageKind::Postgres),
            "memory" | "mem" => Ok(StorageKind::Memory),
            other => Err(format!("unknown storage backend '{other}'")),
        }
    }
}

/// Configuration for the API server.
///
/// Loaded once at startup; handlers read it through `AppState` and never
/// mutate it.
#[derive(Clone)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "0.0.0.0:8080").
    pub bind_addr: String,
    /// PostgreSQL connection URL (unused with `StorageKind::Memory`).
    pub database_url: String,
    pub storage: StorageKind,
    /// Token signing secret.
    pub jwt_secret: String,
    /// Lifetime of issued tokens, in seconds.
    pub token_ttl_secs: i64,
    /// Directory product images are written to.
    pub upload_dir: PathBuf,
    /// Prefix for image URLs; empty yields relative `/uploads/...` URLs.
    pub public_base_url: String,
    pub max_body_bytes: usize,
    pub max_upload_bytes: usize,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable           | Default                                   |
    /// |--------------------|-------------------------------------------|
    /// | `BIND_HOST`        | `0.0.0.0`                                 |
    /// | `PORT`             | `8080`                                    |
    /// | `DATABASE_URL`     | `postgres://localhost:5432/storefront`    |
    /// | `STORAGE`          | `postgres`                                |
    /// | `JWT_SECRET`       | generated & persisted to file             |
    /// | `TOKEN_TTL_SECS`   | `3600` (must be `1..=2592000`)            |
    /// | `UPLOAD_DIR`       | `./uploads`                               |
    /// | `PUBLIC_BASE_URL`  | empty                                     |
    /// | `MAX_BODY_BYTES`   | `1048576`                                 |
    /// | `MAX_UPLOAD_BYTES` | `5242880`                                 |
    pub fn from_env() -> Self {
        let host = env_or("BIND_HOST", "0.0.0.0");
        let port = env_or("PORT", "8080");
        Self {
            bind_addr: format!("{host}:{port}"),
            database_url: env_or("DATABASE_URL", "postgres://localhost:5432/storefront"),
            storage: env_parse("STORAGE", StorageKind::Postgres),
            jwt_secret: resolve_jwt_secret(),
            token_ttl_secs: bounded_token_ttl(env_parse(
                "TOKEN_TTL_SECS",
                DEFAULT_TOKEN_TTL_SECS,
            )),
            upload_dir: PathBuf::from(env_or("UPLOAD_DIR", "./uploads")),
            public_base_url: env_or("PUBLIC_BASE_URL", ""),
            max_body_bytes: env_parse("MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES),
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
        }
    }

    /// Configuration suitable for tests: in-memory storage, fixed secret.
    pub fn for_tests(jwt_secret: impl Into<String>) -> Self {
        Self {
            bind_addr: "127.0.0.1:0".into(),
            database_url: String::new(),
            storage: StorageKind::Memory,
            jwt_secret: jwt_secret.into(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            upload_dir: PathBuf::from("./uploads"),
            public_base_url: String::new(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("bind_addr", &self.bind_addr)
            .field("storage", &self.storage)
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("upload_dir", &self.upload_dir)
            .field("public_base_url", &self.public_base_url)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish_non_exhaustive()
    }
}

/// Lifetimes outside `1..=MAX_TOKEN_TTL_SECS` fall back to the default.
pub fn bounded_token_ttl(secs: i64) -> i64 {
    if (1..=MAX_TOKEN_TTL_SECS).contains(&secs) {
        secs
    } else {
        tracing::warn!(
            value = secs,
            max = MAX_TOKEN_TTL_SECS,
            fallback = DEFAULT_TOKEN_TTL_SECS,
            "TOKEN_TTL_SECS out of range"
        );
        DEFAULT_TOKEN_TTL_SECS
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "ignoring unparsable setting");
            default
        }),
        _ => default,
    }
}
