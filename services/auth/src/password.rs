//! Password hashing with argon2
//!
//! Hashing is deliberately slow, so both operations run on the blocking
//! pool and never while a store lock is held.

use anyhow::{Result, anyhow};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use std::sync::OnceLock;

/// Hash verified on logins for unknown users, so they cost the same as a
/// wrong password
static DUMMY_HASH: OnceLock<String> = OnceLock::new();

fn hash_blocking(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!("Failed to hash password: {}", e))
}

fn verify_blocking(password: &str, password_hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| anyhow!("Failed to parse password hash: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn dummy_hash() -> Result<&'static str> {
    if let Some(hash) = DUMMY_HASH.get() {
        return Ok(hash.as_str());
    }
    let hash = hash_blocking("not-a-real-password")?;
    Ok(DUMMY_HASH.get_or_init(|| hash).as_str())
}

/// Hash a plaintext password with a fresh random salt
pub async fn hash_password(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_blocking(&password)).await?
}

/// Check a plaintext password against a stored hash
pub async fn verify_password(password: String, password_hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || verify_blocking(&password, &password_hash)).await?
}

/// Run a full verification against a throwaway hash and discard the result
pub async fn verify_dummy(password: String) -> Result<()> {
    tokio::task::spawn_blocking(move || {
        verify_blocking(&password, dummy_hash()?)?;
        Ok(())
    })
    .await?
}

/// Compute the throwaway hash ahead of the first login
pub async fn warm_up() -> Result<()> {
    tokio::task::spawn_blocking(|| dummy_hash().map(|_| ())).await?
}
