//! Token primitives shared by the promo platform services

pub mod jwt;

pub use jwt::{Claims, TokenError, TokenService, DEFAULT_TOKEN_TTL};
