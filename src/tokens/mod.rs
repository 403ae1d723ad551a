//! Verification token manager.
//!
//! Issues and validates purpose-scoped, expiring tokens used for email
//! confirmation and password recovery. Tokens are opaque random values; only
//! their SHA-256 digest is stored, embedded on the subject's user record.
//! Re-issuing a token for a subject overwrites (supersedes) any prior
//! unconsumed token.
//!
//! The manager answers exactly one question: "is this token good". What a
//! good token authorizes (marking the principal verified, minting a temporary
//! credential) stays with the caller.

use anyhow::{Context, Result};
use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::SystemTime;
use thiserror::Error;
use uuid::Uuid;

use crate::store::{StoreError, TokenPurpose, UserStore, UserUpdate, VerificationEntry};

#[derive(Debug, Error)]
pub enum VerificationError {
    /// Not-found and expired are deliberately collapsed into one user-facing
    /// error so callers cannot probe which tokens ever existed.
    #[error("invalid or expired token")]
    InvalidOrExpired,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A freshly issued token. `token` is the raw value destined for the
/// verification email; it is never persisted.
#[derive(Debug)]
pub struct IssuedToken {
    pub token: String,
    pub purpose: TokenPurpose,
    pub expires_at: i64,
}

pub struct VerificationTokens {
    store: Arc<dyn UserStore>,
    ttl_seconds: i64,
}

impl VerificationTokens {
    #[must_use]
    pub fn new(store: Arc<dyn UserStore>, ttl_seconds: i64) -> Self {
        Self { store, ttl_seconds }
    }

    /// Issue a token for `user_id`, superseding any previous one.
    ///
    /// # Errors
    /// Returns an error if token generation fails, the store is unreachable,
    /// or the subject does not exist.
    pub async fn issue(&self, user_id: Uuid, purpose: TokenPurpose) -> Result<IssuedToken> {
        let token = generate_token()?;
        let expires_at = now_unix_seconds() + self.ttl_seconds;
        let entry = VerificationEntry {
            value_hash: hash_token(&token),
            purpose,
            expires_at,
        };
        let updated = self
            .store
            .update_user(user_id, UserUpdate::new().with_verification(Some(entry)))
            .await
            .context("failed to persist verification token")?;
        if updated.is_none() {
            anyhow::bail!("verification token subject not found: {user_id}");
        }
        Ok(IssuedToken {
            token,
            purpose,
            expires_at,
        })
    }

    /// Validate a raw token value and return the subject it belongs to.
    ///
    /// # Errors
    /// Returns [`VerificationError::InvalidOrExpired`] when no live token
    /// matches, or a store error when the lookup itself fails.
    pub async fn validate(&self, token: &str) -> Result<Uuid, VerificationError> {
        let value_hash = hash_token(token);
        let user = self
            .store
            .find_user_by_verification_hash(&value_hash, now_unix_seconds())
            .await?;
        user.map(|record| record.id)
            .ok_or(VerificationError::InvalidOrExpired)
    }
}

/// Unix seconds, saturating instead of panicking on clock weirdness.
#[must_use]
pub fn now_unix_seconds() -> i64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Generate an opaque URL-safe token value.
///
/// # Errors
/// Returns an error if the OS entropy source fails.
pub fn generate_token() -> Result<String> {
    let mut bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate verification token")?;
    Ok(Base64UrlUnpadded::encode_string(&bytes))
}

/// Digest a token value for storage; raw tokens never touch the store.
#[must_use]
pub fn hash_token(token: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().to_vec()
}
