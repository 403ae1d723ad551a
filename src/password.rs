//! Password hashing collaborator.
//!
//! Credential verification is delegated behind a trait so the login
//! orchestrator never depends on a specific KDF.

use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, SaltString},
    Argon2, PasswordHasher as _, PasswordVerifier as _,
};

pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into a self-describing digest string.
    ///
    /// # Errors
    /// Returns an error if the underlying KDF fails.
    fn hash(&self, plaintext: &str) -> Result<String>;

    /// Compare a plaintext password against a stored digest.
    fn verify(&self, plaintext: &str, digest: &str) -> bool;
}

/// Argon2id with default parameters and a random per-password salt.
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| anyhow!("failed to hash password: {err}"))
    }

    fn verify(&self, plaintext: &str, digest: &str) -> bool {
        // Malformed digests verify as false rather than erroring; the caller
        // treats both the same way (invalid credentials).
        PasswordHash::new(digest).is_ok_and(|parsed| {
            Argon2::default()
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok()
        })
    }
}
