//! Route paths.

pub const ROOT: &str = "/";
pub const GET_API_HEALTH: &str = "/api/health";

pub const POST_AUTH_REGISTER: &str = "/api/auth/register";
pub const POST_AUTH_LOGIN: &str = "/api/auth/login";

pub const GET_USER_ME: &str = "/api/user/me";

pub const PRODUCTS: &str = "/api/products";
pub const PRODUCTS_ID: &str = "/api/products/{id}";
pub const POST_PRODUCTS_ID_IMAGE: &str = "/api/products/{id}/image";

/// Static files written by the local image store.
pub const UPLOADS: &str = "/uploads";
