//! Sign-up: create an unverified principal and start email verification.

use axum::{
    extract::Extension,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::error::AuthError;
use super::types::SignupRequest;
use super::utils::{normalize_email, valid_email};
use crate::api::email::{spawn_send, EmailSender, VerificationEmail};
use crate::password::PasswordHasher;
use crate::store::{TokenPurpose, UserRecord, UserStore};
use crate::tokens::VerificationTokens;

/// Placeholder for the sign-up page; static assets are served elsewhere.
pub async fn signup_page() -> &'static str {
    "Sign up"
}

/// Create the user, issue an email-verify token, and fire off the
/// verification email. The user stays unverified (and cannot sign in) until
/// the emailed token is validated.
#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignupRequest,
    responses(
        (status = 303, description = "User created, redirect to root"),
        (status = 400, description = "Missing or invalid fields", body = String),
        (status = 409, description = "Email already registered", body = String),
    ),
    tag = "auth"
)]
pub async fn signup(
    store: Extension<Arc<dyn UserStore>>,
    hasher: Extension<Arc<dyn PasswordHasher>>,
    tokens: Extension<Arc<VerificationTokens>>,
    mailer: Extension<Arc<dyn EmailSender>>,
    payload: Option<Json<SignupRequest>>,
) -> Result<Response, AuthError> {
    let Some(Json(request)) = payload else {
        return Err(AuthError::MissingFields);
    };
    let email = normalize_email(&request.email);
    if request.name.trim().is_empty()
        || request.password.is_empty()
        || request.organization.trim().is_empty()
        || request.phone_number.trim().is_empty()
        || email.is_empty()
    {
        return Err(AuthError::MissingFields);
    }
    if !valid_email(&email) {
        return Err(AuthError::MissingFields);
    }

    let user_id = Uuid::new_v4();
    let user = UserRecord {
        id: user_id,
        name: request.name,
        email: email.clone(),
        password_digest: hasher.hash(&request.password)?,
        phone_number: request.phone_number,
        organization: request.organization,
        role: request.role,
        verified: false,
        verification: None,
    };
    store.insert_user(user).await?;

    let issued = tokens.issue(user_id, TokenPurpose::EmailVerify).await?;
    spawn_send(
        Arc::clone(&mailer.0),
        VerificationEmail {
            to_email: email,
            token: issued.token,
            purpose: issued.purpose,
        },
    );

    info!(user_id = %user_id, "user created; verification link sent");
    Ok(Redirect::to("/").into_response())
}
