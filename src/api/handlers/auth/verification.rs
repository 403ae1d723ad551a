//! Email verification endpoints.

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::info;

use super::error::AuthError;
use super::types::{ResendVerificationRequest, VerifyEmailQuery};
use super::utils::normalize_email;
use crate::api::email::{spawn_send, EmailSender, VerificationEmail};
use crate::store::{TokenPurpose, UserStore, UserUpdate};
use crate::tokens::{VerificationError, VerificationTokens};

/// Consume the emailed token and mark the principal verified.
///
/// The token manager only answers whether the token is good; clearing the
/// embedded entry and flipping the verified flag happens here.
#[utoipa::path(
    get,
    path = "/verify-email",
    params(
        ("token" = Option<String>, Query, description = "Raw verification token from the email link")
    ),
    responses(
        (status = 200, description = "Email verified", body = String),
        (status = 400, description = "Missing, invalid, or expired token", body = String),
    ),
    tag = "verification"
)]
pub async fn verify_email(
    store: Extension<Arc<dyn UserStore>>,
    tokens: Extension<Arc<VerificationTokens>>,
    Query(query): Query<VerifyEmailQuery>,
) -> Result<Response, AuthError> {
    let Some(token) = query.token.filter(|token| !token.trim().is_empty()) else {
        return Ok((
            StatusCode::BAD_REQUEST,
            "Verification token is required.".to_string(),
        )
            .into_response());
    };

    let user_id = tokens.validate(token.trim()).await.map_err(|err| match err {
        VerificationError::InvalidOrExpired => AuthError::InvalidOrExpiredToken,
        VerificationError::Store(store_err) => store_err.into(),
    })?;

    // Consume the token and mark the principal verified in one update.
    store
        .update_user(
            user_id,
            UserUpdate::new().with_verified(true).with_verification(None),
        )
        .await?
        .ok_or(AuthError::UserNotFound)?;

    info!(user_id = %user_id, "email verified");
    Ok("Email verified successfully!".into_response())
}

/// Re-issue the verification token for an unverified principal, superseding
/// the previous one.
#[utoipa::path(
    post,
    path = "/resend-verification",
    request_body = ResendVerificationRequest,
    responses(
        (status = 200, description = "Verification email sent", body = String),
        (status = 400, description = "Email is already verified", body = String),
        (status = 404, description = "User not found", body = String),
    ),
    tag = "verification"
)]
pub async fn resend_verification(
    store: Extension<Arc<dyn UserStore>>,
    tokens: Extension<Arc<VerificationTokens>>,
    mailer: Extension<Arc<dyn EmailSender>>,
    payload: Option<Json<ResendVerificationRequest>>,
) -> Result<Response, AuthError> {
    let Some(Json(request)) = payload else {
        return Err(AuthError::MissingFields);
    };
    let email = normalize_email(&request.email);

    let user = store
        .find_user_by_email(&email)
        .await?
        .ok_or(AuthError::UserNotFound)?;
    if user.verified {
        return Err(AuthError::AlreadyVerified);
    }

    let issued = tokens.issue(user.id, TokenPurpose::EmailVerify).await?;
    spawn_send(
        Arc::clone(&mailer.0),
        VerificationEmail {
            to_email: email,
            token: issued.token,
            purpose: issued.purpose,
        },
    );

    Ok((StatusCode::OK, "Verification email sent".to_string()).into_response())
}
