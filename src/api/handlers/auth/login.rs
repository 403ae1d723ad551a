//! Sign-in: credential check and session admission.

use axum::{
    extract::Extension,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use std::sync::Arc;
use tracing::{error, info};

use super::error::AuthError;
use super::types::SigninRequest;
use super::utils::{generate_session_token, normalize_email};
use crate::gate::Gate;
use crate::password::PasswordHasher;
use crate::store::{Role, UserStore};

/// Placeholder for the sign-in page; static assets are served elsewhere.
pub async fn signin_page() -> &'static str {
    "Sign in"
}

/// Verify credentials, mint a session token, and enqueue it for admission.
///
/// On success the registry and pending queue each gain one paired entry, the
/// durable token copy is written off the request path, and the client is
/// redirected to the application root.
#[utoipa::path(
    post,
    path = "/signin",
    request_body = SigninRequest,
    responses(
        (status = 303, description = "Login successful, redirect to root"),
        (status = 401, description = "Invalid credentials or wrong role", body = String),
        (status = 400, description = "Missing fields", body = String),
    ),
    tag = "auth"
)]
pub async fn signin(
    gate: Extension<Arc<Gate>>,
    store: Extension<Arc<dyn UserStore>>,
    hasher: Extension<Arc<dyn PasswordHasher>>,
    payload: Option<Json<SigninRequest>>,
) -> Result<Response, AuthError> {
    let Some(Json(request)) = payload else {
        return Err(AuthError::MissingFields);
    };
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(AuthError::MissingFields);
    }

    let email = normalize_email(&request.email);
    let user = store
        .find_user_by_email(&email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !hasher.verify(&request.password, &user.password_digest) {
        return Err(AuthError::InvalidCredentials);
    }
    if user.role == Role::Admin {
        return Err(AuthError::WrongRole);
    }
    if !user.verified {
        return Err(AuthError::NotVerified);
    }

    let token = generate_session_token()?;
    let outcome = gate.ledger().admit(&token).await;

    // Durable copy is written outside the ledger lock and off the request
    // path; a failed write never reverses the admission.
    let durable_store = Arc::clone(&store.0);
    let durable_token = token.clone();
    tokio::spawn(async move {
        if let Err(err) = durable_store.insert_session_token(&durable_token).await {
            error!("failed to persist session token copy: {err}");
        }
    });

    if outcome.was_empty {
        gate.timer().ensure_armed();
    }

    info!(user_id = %user.id, "user logged in; session token enqueued");
    Ok(Redirect::to("/").into_response())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::handlers::auth::GateConfig;
    use crate::gate::{ExpiryTimer, SessionLedger};
    use crate::password::Argon2Hasher;
    use crate::store::{InMemoryStore, UserRecord};
    use anyhow::Result;
    use axum::http::StatusCode;
    use std::time::Duration;
    use uuid::Uuid;

    pub(crate) struct Harness {
        pub gate: Arc<Gate>,
        pub store: Arc<InMemoryStore>,
        pub hasher: Arc<Argon2Hasher>,
    }

    pub(crate) fn harness() -> Harness {
        let store = Arc::new(InMemoryStore::new());
        let dyn_store: Arc<dyn UserStore> = store.clone();
        let ledger = Arc::new(SessionLedger::new());
        let config = GateConfig::new();
        let timer = ExpiryTimer::new(
            ledger.clone(),
            Arc::clone(&dyn_store),
            Duration::from_secs(config.session_ttl_seconds()),
        );
        Harness {
            gate: Arc::new(Gate::new(ledger, timer, dyn_store)),
            store,
            hasher: Arc::new(Argon2Hasher),
        }
    }

    pub(crate) async fn seed_user(
        harness: &Harness,
        email: &str,
        password: &str,
        role: Role,
        verified: bool,
    ) -> Result<Uuid> {
        let id = Uuid::new_v4();
        harness
            .store
            .insert_user(UserRecord {
                id,
                name: "Alice".to_string(),
                email: email.to_string(),
                password_digest: harness.hasher.hash(password)?,
                phone_number: "555-0100".to_string(),
                organization: "Acme".to_string(),
                role,
                verified,
                verification: None,
            })
            .await?;
        Ok(id)
    }

    fn request(email: &str, password: &str) -> Option<Json<SigninRequest>> {
        Some(Json(SigninRequest {
            email: email.to_string(),
            password: password.to_string(),
        }))
    }

    async fn call(harness: &Harness, payload: Option<Json<SigninRequest>>) -> Response {
        let dyn_store: Arc<dyn UserStore> = harness.store.clone();
        let dyn_hasher: Arc<dyn PasswordHasher> = harness.hasher.clone();
        signin(
            Extension(harness.gate.clone()),
            Extension(dyn_store),
            Extension(dyn_hasher),
            payload,
        )
        .await
        .into_response()
    }

    #[tokio::test]
    async fn successful_login_admits_one_paired_entry() -> Result<()> {
        let harness = harness();
        seed_user(&harness, "alice@example.com", "hunter2", Role::User, true).await?;

        let response = call(&harness, request("alice@example.com", "hunter2")).await;
        assert!(response.status().is_redirection());
        assert_eq!(
            response
                .headers()
                .get(axum::http::header::LOCATION)
                .and_then(|value| value.to_str().ok()),
            Some("/")
        );

        let (registry, queue) = harness.gate.ledger().snapshot().await;
        assert_eq!(registry.len(), 1);
        assert_eq!(registry, queue);
        assert!(harness.gate.timer().is_armed());

        tokio::task::yield_now().await;
        assert_eq!(harness.store.session_token_count().await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn unknown_user_is_invalid_credentials() {
        let harness = harness();
        let response = call(&harness, request("ghost@example.com", "hunter2")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(harness.gate.ledger().is_empty().await);
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_credentials() -> Result<()> {
        let harness = harness();
        seed_user(&harness, "alice@example.com", "hunter2", Role::User, true).await?;
        let response = call(&harness, request("alice@example.com", "wrong")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn admin_role_is_rejected() -> Result<()> {
        let harness = harness();
        seed_user(&harness, "root@example.com", "hunter2", Role::Admin, true).await?;
        let response = call(&harness, request("root@example.com", "hunter2")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(harness.gate.ledger().is_empty().await);
        Ok(())
    }

    #[tokio::test]
    async fn unverified_user_redirects_to_signup_without_admission() -> Result<()> {
        let harness = harness();
        seed_user(&harness, "bob@example.com", "hunter2", Role::User, false).await?;
        let response = call(&harness, request("bob@example.com", "hunter2")).await;
        assert!(response.status().is_redirection());
        assert_eq!(
            response
                .headers()
                .get(axum::http::header::LOCATION)
                .and_then(|value| value.to_str().ok()),
            Some("/signup")
        );
        assert!(harness.gate.ledger().is_empty().await);
        Ok(())
    }

    #[tokio::test]
    async fn second_login_queues_behind_first_head() -> Result<()> {
        let harness = harness();
        seed_user(&harness, "alice@example.com", "hunter2", Role::User, true).await?;
        seed_user(&harness, "carol@example.com", "hunter2", Role::User, true).await?;

        call(&harness, request("alice@example.com", "hunter2")).await;
        let head_before = harness.gate.ledger().head().await;
        call(&harness, request("carol@example.com", "hunter2")).await;

        assert_eq!(harness.gate.ledger().len().await, 2);
        assert_eq!(harness.gate.ledger().head().await, head_before);
        let (registry, queue) = harness.gate.ledger().snapshot().await;
        assert_eq!(registry, queue);
        Ok(())
    }

    #[tokio::test]
    async fn missing_payload_is_bad_request() {
        let harness = harness();
        let response = call(&harness, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
