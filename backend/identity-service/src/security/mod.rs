/// Security primitives for identity-service
///
/// - **password**: Argon2id password hashing
/// - token issuing lives in `crypto_core::jwt` and is shared with every
///   service that validates tokens
pub mod password;

pub use password::{hash_password, verify_password};
