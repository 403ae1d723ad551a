//! Explicit session reset (logout).

use axum::{extract::Extension, http::StatusCode, response::IntoResponse};
use std::sync::Arc;
use tracing::{error, info};

use crate::gate::Gate;

/// Retire the head session unconditionally: both ledger columns lose their
/// head entry and the durable token copy is deleted. No-op when nothing is
/// queued. The armed expiry timer is deliberately left running; it fires
/// harmlessly on an empty queue.
#[utoipa::path(
    post,
    path = "/reset-session",
    responses(
        (status = 200, description = "Session reset", body = String),
    ),
    tag = "auth"
)]
pub async fn reset_session(gate: Extension<Arc<Gate>>) -> impl IntoResponse {
    if let Some(token) = gate.ledger().evict_heads().await {
        let store = Arc::clone(gate.store());
        tokio::spawn(async move {
            if let Err(err) = store.delete_session_token(&token).await {
                error!("failed to delete session token copy on reset: {err}");
            }
        });
        info!("session reset; head retired");
    }
    (StatusCode::OK, "Session reset")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::auth::login::tests::{harness, seed_user};
    use crate::store::{Role, UserStore};
    use anyhow::Result;

    #[tokio::test]
    async fn reset_removes_exactly_one_entry_and_durable_copy() -> Result<()> {
        let harness = harness();
        seed_user(&harness, "alice@example.com", "hunter2", Role::User, true).await?;

        harness.gate.ledger().admit("tok-1").await;
        harness.gate.ledger().admit("tok-2").await;
        harness.store.insert_session_token("tok-1").await?;
        harness.store.insert_session_token("tok-2").await?;

        let response = reset_session(Extension(harness.gate.clone()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        tokio::task::yield_now().await;
        assert_eq!(harness.gate.ledger().len().await, 1);
        assert_eq!(harness.gate.ledger().head().await.as_deref(), Some("tok-2"));
        assert_eq!(harness.store.session_token_count().await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn reset_on_empty_collections_is_noop() {
        let harness = harness();
        let response = reset_session(Extension(harness.gate.clone()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(harness.gate.ledger().is_empty().await);
    }
}
