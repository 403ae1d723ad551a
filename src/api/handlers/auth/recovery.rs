//! Password recovery: temporary password issue and reset-token bookkeeping.

use axum::{extract::Extension, http::StatusCode, response::{IntoResponse, Response}, Json};
use std::sync::Arc;
use tracing::info;

use super::error::AuthError;
use super::types::{MessageResponse, RecoverPasswordRequest};
use super::utils::{generate_temporary_password, normalize_email};
use crate::api::email::{spawn_send, EmailSender, VerificationEmail};
use crate::password::PasswordHasher;
use crate::store::{TokenPurpose, UserStore, UserUpdate};
use crate::tokens::VerificationTokens;

const TEMPORARY_PASSWORD_LENGTH: usize = 12;

/// Replace the principal's password with a random temporary one and demote
/// them to unverified until the reset token is consumed.
///
/// The temporary password is returned in the response body; an unknown email
/// gets a plain 401 rather than a silent success.
#[utoipa::path(
    post,
    path = "/recoverpass",
    request_body = RecoverPasswordRequest,
    responses(
        (status = 200, description = "Temporary password issued", body = MessageResponse),
        (status = 400, description = "Missing email", body = String),
        (status = 401, description = "Unknown email address", body = String),
    ),
    tag = "auth"
)]
pub async fn recover_password(
    store: Extension<Arc<dyn UserStore>>,
    hasher: Extension<Arc<dyn PasswordHasher>>,
    tokens: Extension<Arc<VerificationTokens>>,
    mailer: Extension<Arc<dyn EmailSender>>,
    payload: Option<Json<RecoverPasswordRequest>>,
) -> Result<Response, AuthError> {
    let Some(Json(request)) = payload else {
        return Err(AuthError::MissingFields);
    };
    let email = normalize_email(&request.email);
    if email.is_empty() {
        return Err(AuthError::MissingFields);
    }

    let Some(user) = store.find_user_by_email(&email).await? else {
        return Ok((
            StatusCode::UNAUTHORIZED,
            "Invalid email address. Please try again.".to_string(),
        )
            .into_response());
    };

    let temporary_password = generate_temporary_password(TEMPORARY_PASSWORD_LENGTH);
    let digest = hasher.hash(&temporary_password)?;

    // The account goes back through verification before the temporary
    // password can be used to sign in.
    store
        .update_user(
            user.id,
            UserUpdate::new().with_password_digest(digest).with_verified(false),
        )
        .await?
        .ok_or(AuthError::UserNotFound)?;

    let issued = tokens.issue(user.id, TokenPurpose::PasswordReset).await?;
    spawn_send(
        Arc::clone(&mailer.0),
        VerificationEmail {
            to_email: email,
            token: issued.token,
            purpose: issued.purpose,
        },
    );

    info!(user_id = %user.id, "temporary password issued");
    Ok(Json(MessageResponse {
        message: format!("Your temporary password is: {temporary_password}"),
    })
    .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::email::LogEmailSender;
    use crate::password::Argon2Hasher;
    use crate::store::{InMemoryStore, Role, UserRecord};
    use anyhow::Result;
    use http_body_util::BodyExt;
    use serde_json::json;
    use uuid::Uuid;

    struct Harness {
        store: Arc<InMemoryStore>,
        hasher: Arc<Argon2Hasher>,
        tokens: Arc<VerificationTokens>,
    }

    fn harness() -> Harness {
        let store = Arc::new(InMemoryStore::new());
        let dyn_store: Arc<dyn UserStore> = store.clone();
        Harness {
            store,
            hasher: Arc::new(Argon2Hasher),
            tokens: Arc::new(VerificationTokens::new(dyn_store, 3600)),
        }
    }

    async fn seed_user(harness: &Harness, email: &str, password: &str) -> Result<Uuid> {
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
                role: Role::User,
                verified: true,
                verification: None,
            })
            .await?;
        Ok(id)
    }

    async fn call(harness: &Harness, email: &str) -> Response {
        let dyn_store: Arc<dyn UserStore> = harness.store.clone();
        let dyn_hasher: Arc<dyn PasswordHasher> = harness.hasher.clone();
        let dyn_mailer: Arc<dyn EmailSender> = Arc::new(LogEmailSender);
        let payload = serde_json::from_value(json!({ "email": email })).ok().map(Json);
        recover_password(
            Extension(dyn_store),
            Extension(dyn_hasher),
            Extension(harness.tokens.clone()),
            Extension(dyn_mailer),
            payload,
        )
        .await
        .into_response()
    }

    #[tokio::test]
    async fn recovery_rotates_password_and_demotes_to_unverified() -> Result<()> {
        let harness = harness();
        seed_user(&harness, "alice@example.com", "hunter2").await?;

        let response = call(&harness, "alice@example.com").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await?.to_bytes();
        let message: MessageResponse = serde_json::from_slice(&body)?;
        let temporary = message
            .message
            .rsplit(' ')
            .next()
            .expect("temporary password in message")
            .to_string();

        let user = harness
            .store
            .find_user_by_email("alice@example.com")
            .await?
            .unwrap();
        assert!(!user.verified);
        assert!(!harness.hasher.verify("hunter2", &user.password_digest));
        assert!(harness.hasher.verify(&temporary, &user.password_digest));

        let entry = user.verification.expect("reset token embedded");
        assert_eq!(entry.purpose, TokenPurpose::PasswordReset);
        Ok(())
    }

    #[tokio::test]
    async fn unknown_email_is_unauthorized() {
        let harness = harness();
        let response = call(&harness, "ghost@example.com").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn missing_email_is_bad_request() {
        let harness = harness();
        let response = call(&harness, " ").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
