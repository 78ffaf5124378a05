//! Salted one-way password hashing
//!
//! Hashes are Argon2id PHC strings: the salt and parameters travel inside the
//! encoded hash, so no separate salt column is needed. Handlers use the async
//! [`hash`] and [`verify`], which run Argon2 on the blocking thread pool.

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use tracing::{error, warn};

/// Hash `password` on the blocking pool
pub async fn hash(password: &str) -> Result<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || hash_password(&password)).await?
}

/// Verify `password` against `password_hash` on the blocking pool
pub async fn verify(password: &str, password_hash: &str) -> bool {
    let password = password.to_string();
    let password_hash = password_hash.to_string();
    match tokio::task::spawn_blocking(move || verify_password(&password, &password_hash)).await {
        Ok(matches) => matches,
        Err(e) => {
            error!("Password verification task failed: {}", e);
            false
        }
    }
}

/// Hash a password with a freshly generated salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against a stored hash
///
/// A malformed hash is reported as a mismatch.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(password_hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Stored password hash could not be parsed: {}", e);
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
