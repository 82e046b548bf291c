//! Password hashing with Argon2 (PHC string format).
//!
//! Argon2 is deliberately slow, so the public functions run it on the
//! blocking thread pool instead of a runtime worker.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use tokio::task;

use crate::error::{ApiError, Result};

/// Hash a password into a PHC string.
pub async fn hash_password(password: String) -> Result<String> {
    task::spawn_blocking(move || hash_blocking(&password))
        .await
        .map_err(|e| ApiError::internal(format!("Password hashing task failed: {}", e)))?
}

/// Check a password against a stored PHC string. Malformed hashes never match.
pub async fn verify_password(password: String, password_hash: String) -> Result<bool> {
    task::spawn_blocking(move || verify_blocking(&password, &password_hash))
        .await
        .map_err(|e| ApiError::internal(format!("Password verification task failed: {}", e)))
}

fn hash_blocking(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::internal(format!("Failed to hash password: {}", e)))
}

fn verify_blocking(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_blocking("123456").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_blocking("123456", &hash));
        assert!(!verify_blocking("654321", &hash));
    }

    #[test]
    fn test_salts_differ() {
        assert_ne!(hash_blocking("same").unwrap(), hash_blocking("same").unwrap());
    }

    #[test]
    fn test_malformed_hash_never_matches() {
        assert!(!verify_blocking("123456", "not-a-phc-string"));
        assert!(!verify_blocking("", ""));
    }

    #[tokio::test]
    async fn test_async_hash_and_verify() {
        let hash = hash_password("123456".into()).await.unwrap();
        assert!(verify_password("123456".into(), hash.clone()).await.unwrap());
        assert!(!verify_password("wrong".into(), hash).await.unwrap());
    }
}
