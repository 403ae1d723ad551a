//! In-memory [`UserStore`] used by dev mode and the test suite.

use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreError, UserRecord, UserStore, UserUpdate};
use async_trait::async_trait;

#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<Uuid, UserRecord>>,
    session_tokens: RwLock<Vec<String>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of durable session-token copies currently held.
    pub async fn session_token_count(&self) -> usize {
        self.session_tokens.read().await.len()
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    async fn find_user_by_verification_hash(
        &self,
        value_hash: &[u8],
        now: i64,
    ) -> Result<Option<UserRecord>, StoreError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|user| {
                user.verification
                    .as_ref()
                    .is_some_and(|entry| entry.value_hash == value_hash && entry.expires_at > now)
            })
            .cloned())
    }

    async fn insert_user(&self, user: UserRecord) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|existing| existing.email == user.email) {
            return Err(StoreError::DuplicateKey(user.email));
        }
        users.insert(user.id, user);
        Ok(())
    }

    async fn update_user(
        &self,
        id: Uuid,
        update: UserUpdate,
    ) -> Result<Option<UserRecord>, StoreError> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(digest) = update.password_digest {
            user.password_digest = digest;
        }
        if let Some(verified) = update.verified {
            user.verified = verified;
        }
        if let Some(entry) = update.verification {
            user.verification = entry;
        }
        Ok(Some(user.clone()))
    }

    async fn insert_session_token(&self, token: &str) -> Result<(), StoreError> {
        self.session_tokens.write().await.push(token.to_string());
        Ok(())
    }

    async fn delete_session_token(&self, token: &str) -> Result<bool, StoreError> {
        let mut tokens = self.session_tokens.write().await;
        let before = tokens.len();
        tokens.retain(|stored| stored != token);
        Ok(tokens.len() != before)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
