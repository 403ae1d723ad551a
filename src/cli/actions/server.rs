use crate::{
    api,
    api::email::{EmailSender, LogEmailSender},
    api::handlers::auth::GateConfig,
    password::{Argon2Hasher, PasswordHasher},
    store::{InMemoryStore, UserStore},
};
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub session_ttl_seconds: u64,
    pub verification_ttl_seconds: i64,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    info!(
        port = args.port,
        session_ttl_seconds = args.session_ttl_seconds,
        verification_ttl_seconds = args.verification_ttl_seconds,
        "starting server"
    );

    let config = GateConfig::new()
        .with_session_ttl_seconds(args.session_ttl_seconds)
        .with_verification_ttl_seconds(args.verification_ttl_seconds);

    let store: Arc<dyn UserStore> = Arc::new(InMemoryStore::new());
    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2Hasher);
    let mailer: Arc<dyn EmailSender> = Arc::new(LogEmailSender);

    api::new(args.port, &config, store, hasher, mailer).await
}
