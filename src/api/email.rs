//! Outbound email delivery abstraction.
//!
//! Verification and recovery flows hand an [`EmailSender`] the raw token and
//! move on: delivery is fire-and-forget from the triggering request's point
//! of view, and a failed send is logged, never surfaced as an HTTP error.
//! The default sender for local dev logs the payload instead of sending.

use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};

use crate::store::TokenPurpose;

#[derive(Clone, Debug)]
pub struct VerificationEmail {
    pub to_email: String,
    pub token: String,
    pub purpose: TokenPurpose,
}

/// Email delivery seam. Implementations decide the transport (SMTP, API, …).
pub trait EmailSender: Send + Sync {
    /// Deliver a message or return an error, which the caller logs.
    ///
    /// # Errors
    /// Returns an error when delivery fails.
    fn send(&self, message: &VerificationEmail) -> Result<()>;
}

/// Local dev sender that logs instead of sending real email.
#[derive(Clone, Debug, Default)]
pub struct LogEmailSender;

impl EmailSender for LogEmailSender {
    fn send(&self, message: &VerificationEmail) -> Result<()> {
        info!(
            to_email = %message.to_email,
            purpose = message.purpose.as_str(),
            "verification email send stub"
        );
        Ok(())
    }
}

/// Submit a send on a background task; failures are logged and swallowed.
pub fn spawn_send(sender: Arc<dyn EmailSender>, message: VerificationEmail) {
    tokio::spawn(async move {
        if let Err(err) = sender.send(&message) {
            error!(
                to_email = %message.to_email,
                "failed to send verification email: {err}"
            );
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Test double that records sends and optionally fails.
    #[derive(Default)]
    pub(crate) struct RecordingSender {
        pub sent: Mutex<Vec<VerificationEmail>>,
        pub fail: bool,
    }

    impl EmailSender for RecordingSender {
        fn send(&self, message: &VerificationEmail) -> Result<()> {
            if self.fail {
                anyhow::bail!("smtp down");
            }
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn spawn_send_delivers_in_background() {
        let sender = Arc::new(RecordingSender::default());
        spawn_send(
            sender.clone(),
            VerificationEmail {
                to_email: "alice@example.com".to_string(),
                token: "tok".to_string(),
                purpose: TokenPurpose::EmailVerify,
            },
        );
        tokio::task::yield_now().await;
        assert_eq!(sender.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn spawn_send_swallows_failures() {
        let sender = Arc::new(RecordingSender {
            fail: true,
            ..RecordingSender::default()
        });
        spawn_send(
            sender.clone(),
            VerificationEmail {
                to_email: "alice@example.com".to_string(),
                token: "tok".to_string(),
                purpose: TokenPurpose::PasswordReset,
            },
        );
        tokio::task::yield_now().await;
        assert!(sender.sent.lock().unwrap().is_empty());
    }
}
