//! Signing secret resolution.
//!
//! The secret is read once at startup and handed to [`super::TokenCodec`];
//! nothing reads it from the environment afterwards.

use std::path::{Path, PathBuf};

use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use tracing::{info, warn};

/// Environment variable holding the signing secret.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Length of a generated secret.
const GENERATED_SECRET_LEN: usize = 64;

/// Resolve the signing secret: `JWT_SECRET` → persisted file → freshly
/// generated (and persisted so restarts keep issued tokens valid).
pub fn resolve_jwt_secret() -> String {
    if let Ok(secret) = std::env::var(JWT_SECRET_ENV)
        && !secret.trim().is_empty()
    {
        return secret;
    }
    warn!("{JWT_SECRET_ENV} is not set; falling back to a persisted local secret");
    load_or_generate(&jwt_secret_path())
}

/// Read a non-empty secret from `path`, or generate one and try to store it.
pub fn load_or_generate(path: &Path) -> String {
    if let Ok(existing) = std::fs::read_to_string(path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    let secret = generate_secret();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    match std::fs::write(path, &secret) {
        Ok(()) => info!(path = %path.display(), "generated new JWT secret"),
        Err(e) => warn!(path = %path.display(), error = %e, "could not persist JWT secret"),
    }
    secret
}

fn generate_secret() -> String {
    rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_SECRET_LEN)
        .map(char::from)
        .collect()
}

/// Path to the persisted secret file.
fn jwt_secret_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("storefront")
        .join("jwt-secret")
}
