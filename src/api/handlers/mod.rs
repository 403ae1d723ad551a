//! Route handlers for the gatehouse API.

pub mod auth;
pub mod health;
pub mod root;

pub use auth::AuthError;
