//! Auth handlers: sign-in/sign-up, session reset, email verification, and
//! password recovery.

pub(crate) mod error;
pub(crate) mod login;
pub(crate) mod recovery;
pub(crate) mod session;
pub(crate) mod signup;
pub(crate) mod types;
mod utils;
pub(crate) mod verification;

pub use error::AuthError;

/// Default maximum session lifetime: 30 days.
const DEFAULT_SESSION_TTL_SECONDS: u64 = 30 * 24 * 60 * 60;
/// Default verification-token lifetime: one hour.
const DEFAULT_VERIFICATION_TTL_SECONDS: i64 = 60 * 60;

/// Runtime configuration for the gate and token lifetimes.
#[derive(Clone, Debug)]
pub struct GateConfig {
    session_ttl_seconds: u64,
    verification_ttl_seconds: i64,
}

impl GateConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            verification_ttl_seconds: DEFAULT_VERIFICATION_TTL_SECONDS,
        }
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: u64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_verification_ttl_seconds(mut self, seconds: i64) -> Self {
        self.verification_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn session_ttl_seconds(&self) -> u64 {
        self.session_ttl_seconds
    }

    #[must_use]
    pub fn verification_ttl_seconds(&self) -> i64 {
        self.verification_ttl_seconds
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_config_defaults_and_overrides() {
        let config = GateConfig::new();
        assert_eq!(config.session_ttl_seconds(), DEFAULT_SESSION_TTL_SECONDS);
        assert_eq!(
            config.verification_ttl_seconds(),
            DEFAULT_VERIFICATION_TTL_SECONDS
        );

        let config = config
            .with_session_ttl_seconds(120)
            .with_verification_ttl_seconds(30);
        assert_eq!(config.session_ttl_seconds(), 120);
        assert_eq!(config.verification_ttl_seconds(), 30);
    }
}
