//! # Actix Middleware Library
//!
//! Middleware components shared by the promo platform's Actix services
//!
//! ## Modules
//! - `jwt_auth`: bearer-token authentication and the `UserId` extractor
//! - `logging`: per-request method/path/status/latency logging

pub mod jwt_auth;
pub mod logging;

pub use jwt_auth::{authenticate, JwtAuthMiddleware, UserId};
pub use logging::RequestLogging;
