//! Password hashing and verification using Argon2id

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use error_types::{ServiceError, ServiceResult};

/// Hash a password using Argon2id algorithm
///
/// Returns a PHC-formatted hash string (algorithm, parameters and the
/// random per-password salt are all embedded) safe for database storage.
pub fn hash_password(password: &str) -> ServiceResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::internal(anyhow::anyhow!("Password hashing failed: {e}")))
}

/// Verify a password against its hash
///
/// `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable.
pub fn verify_password(password: &str, password_hash: &str) -> ServiceResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash).map_err(|e| {
        ServiceError::internal(anyhow::anyhow!("Invalid password hash format: {e}"))
    })?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(ServiceError::internal(anyhow::anyhow!(
            "Password verification failed: {e}"
        ))),
    }
}
