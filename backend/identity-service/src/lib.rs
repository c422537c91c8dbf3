/// Identity Service Library
///
/// Registration, login and profile management for platform users.
///
/// ## Modules
///
/// - `config`: Service configuration
/// - `db`: User repositories (PostgreSQL and in-memory)
/// - `http`: Actix routes and handlers
/// - `models`: Data models and request DTOs
/// - `security`: Password hashing
/// - `services`: Business logic
pub mod config;
pub mod db;
pub mod http;
pub mod models;
pub mod security;
pub mod services;

// Re-export commonly used types
pub use db::{InMemoryUserRepository, PgUserRepository, UserRepository};
pub use models::User;
pub use services::UserService;
