//! Document-store collaborator interface.
//!
//! The gate core never talks to a concrete database; it goes through
//! [`UserStore`], a thin trait shaped after a remote document store
//! (find/insert/update/find-and-delete with exact-match filters). Production
//! deployments point this at their store of record; dev mode and the test
//! suite use the in-memory implementation in [`memory`].

pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

pub use memory::InMemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or the operation failed remotely.
    #[error("document store unavailable: {0}")]
    Unavailable(String),
    /// A uniqueness constraint (email) was violated on insert.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),
}

/// Principal role stored on the user record. Only `User` may hold the
/// admitted session slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Role {
    User,
    Admin,
}

/// What a verification token authorizes once validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPurpose {
    EmailVerify,
    PasswordReset,
}

impl TokenPurpose {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmailVerify => "email-verify",
            Self::PasswordReset => "password-reset",
        }
    }
}

/// Verification token material embedded on the user record.
///
/// Only the digest of the token value is stored; the raw value travels in the
/// verification email and is never persisted.
#[derive(Debug, Clone)]
pub struct VerificationEntry {
    pub value_hash: Vec<u8>,
    pub purpose: TokenPurpose,
    /// Unix seconds after which the token no longer validates.
    pub expires_at: i64,
}

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_digest: String,
    pub phone_number: String,
    pub organization: String,
    pub role: Role,
    pub verified: bool,
    pub verification: Option<VerificationEntry>,
}

/// Partial update applied to a user record, `$set` style: `None` fields are
/// left untouched.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub password_digest: Option<String>,
    pub verified: Option<bool>,
    /// `Some(None)` clears the embedded verification entry.
    pub verification: Option<Option<VerificationEntry>>,
}

impl UserUpdate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_password_digest(mut self, digest: String) -> Self {
        self.password_digest = Some(digest);
        self
    }

    #[must_use]
    pub fn with_verified(mut self, verified: bool) -> Self {
        self.verified = Some(verified);
        self
    }

    #[must_use]
    pub fn with_verification(mut self, entry: Option<VerificationEntry>) -> Self {
        self.verification = Some(entry);
        self
    }
}

/// Persistent storage operations the gate core depends on.
///
/// Session-token rows exist for crash durability and audit only; the
/// in-memory ledger remains authoritative for admission decisions, and a
/// failed write here never reverses a decision already made.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Exact-match lookup on the embedded verification token digest, bounded
    /// by expiry: only records with `expires_at > now` match.
    async fn find_user_by_verification_hash(
        &self,
        value_hash: &[u8],
        now: i64,
    ) -> Result<Option<UserRecord>, StoreError>;

    async fn insert_user(&self, user: UserRecord) -> Result<(), StoreError>;

    /// Apply a partial update; returns the updated record, or `None` when the
    /// id does not exist.
    async fn update_user(
        &self,
        id: Uuid,
        update: UserUpdate,
    ) -> Result<Option<UserRecord>, StoreError>;

    /// Persist the durable copy of a session token minted at login.
    async fn insert_session_token(&self, token: &str) -> Result<(), StoreError>;

    /// Delete the durable copy of an evicted session token. Returns whether a
    /// row was actually removed.
    async fn delete_session_token(&self, token: &str) -> Result<bool, StoreError>;

    /// Cheap reachability probe for `/health`.
    async fn ping(&self) -> Result<(), StoreError>;
}
