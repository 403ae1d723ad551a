//! Global admission control.
//!
//! Every inbound request passes through [`admission_gate`] before routing.
//! The gate consults the [`SessionLedger`] head: with no queued token only
//! the entry paths pass, with an admitted head everything but the entry
//! paths passes, and a stale head (no registry match) is evicted and the
//! request bounced to sign-in. Verification and recovery paths are exempt so
//! a locked-out user can still complete those flows.

pub mod expiry;
pub mod ledger;

use axum::{
    extract::{Extension, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::{debug, info};

use crate::store::UserStore;
pub use expiry::ExpiryTimer;
pub use ledger::{AdmitOutcome, GateState, SessionLedger, SessionRecord};

/// Paths that bypass the gate entirely (case-insensitive exact match).
const EXEMPT_PATHS: &[&str] = &["/verify-email", "/resend-verification", "/recoverpass"];

/// Paths a signed-out visitor may reach; an admitted one is bounced to root.
const ENTRY_PATHS: &[&str] = &["/signin", "/signup"];

const SIGNIN_REDIRECT: &str = "/signin";
const ROOT_REDIRECT: &str = "/";

fn is_exempt(path: &str) -> bool {
    EXEMPT_PATHS.iter().any(|p| path.eq_ignore_ascii_case(p))
}

fn is_entry(path: &str) -> bool {
    ENTRY_PATHS.iter().any(|p| path.eq_ignore_ascii_case(p))
}

/// Gate outcome for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Pass,
    Redirect(&'static str),
}

/// Shared admission state: the ledger, its expiry timer, and the store used
/// for durable-copy cleanup on stale evictions.
pub struct Gate {
    ledger: Arc<SessionLedger>,
    timer: Arc<ExpiryTimer>,
    store: Arc<dyn UserStore>,
}

impl Gate {
    #[must_use]
    pub fn new(
        ledger: Arc<SessionLedger>,
        timer: Arc<ExpiryTimer>,
        store: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            ledger,
            timer,
            store,
        }
    }

    #[must_use]
    pub fn ledger(&self) -> &Arc<SessionLedger> {
        &self.ledger
    }

    #[must_use]
    pub fn timer(&self) -> &Arc<ExpiryTimer> {
        &self.timer
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn UserStore> {
        &self.store
    }

    /// Evaluate one request path against the current gate state.
    pub async fn evaluate(&self, path: &str) -> GateDecision {
        if is_exempt(path) {
            return GateDecision::Pass;
        }

        let decision = match self.ledger.check_head().await {
            GateState::NoSession => {
                debug!(path, "no admitted session");
                if is_entry(path) {
                    GateDecision::Pass
                } else {
                    GateDecision::Redirect(SIGNIN_REDIRECT)
                }
            }
            GateState::Admitted => {
                if is_entry(path) {
                    GateDecision::Redirect(ROOT_REDIRECT)
                } else {
                    GateDecision::Pass
                }
            }
            GateState::Stale { evicted } => {
                info!(path, "stale session head evicted");
                let store = Arc::clone(&self.store);
                // Off the request path; the redirect does not wait on the store.
                tokio::spawn(async move {
                    if let Err(err) = store.delete_session_token(&evicted).await {
                        tracing::error!("failed to delete stale session token copy: {err}");
                    }
                });
                GateDecision::Redirect(SIGNIN_REDIRECT)
            }
        };

        if !self.ledger.is_empty().await {
            self.timer.ensure_armed();
        }

        decision
    }
}

/// Axum middleware wrapping [`Gate::evaluate`]; redirects short-circuit the
/// handler chain.
pub async fn admission_gate(
    Extension(gate): Extension<Arc<Gate>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    match gate.evaluate(&path).await {
        GateDecision::Pass => next.run(request).await,
        GateDecision::Redirect(target) => Redirect::to(target).into_response(),
    }
}
