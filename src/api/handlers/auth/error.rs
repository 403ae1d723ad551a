//! Request-boundary error taxonomy.
//!
//! Every failure in the auth flows is caught here, logged, and mapped to a
//! status plus a plain message (or a redirect for the unverified case).
//! Nothing is retried and nothing crashes the process; store failures
//! degrade to a generic server error.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Error: Invalid email or password")]
    InvalidCredentials,
    /// Principal exists but has not confirmed their email; sent back to
    /// sign-up to restart verification.
    #[error("Error: Account is not verified")]
    NotVerified,
    #[error("Error: You are not a User")]
    WrongRole,
    #[error("Invalid or expired token.")]
    InvalidOrExpiredToken,
    #[error("Error: Email is already verified")]
    AlreadyVerified,
    #[error("Error: User not found")]
    UserNotFound,
    #[error("Error: Missing fields")]
    MissingFields,
    #[error("Error: Email is already registered")]
    EmailTaken,
    #[error("store operation failed")]
    Store(#[source] StoreError),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey(_) => Self::EmailTaken,
            err => Self::Store(err),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidCredentials | Self::WrongRole => {
                warn!("rejected login: {self}");
                (StatusCode::UNAUTHORIZED, self.to_string()).into_response()
            }
            Self::NotVerified => {
                warn!("rejected login: account not verified");
                Redirect::to("/signup").into_response()
            }
            Self::InvalidOrExpiredToken | Self::AlreadyVerified | Self::MissingFields => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            Self::UserNotFound => (StatusCode::NOT_FOUND, self.to_string()).into_response(),
            Self::EmailTaken => (StatusCode::CONFLICT, self.to_string()).into_response(),
            Self::Store(err) => {
                error!("store operation failed: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
                    .into_response()
            }
            Self::Internal(err) => {
                error!("internal error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
                    .into_response()
            }
        }
    }
}
