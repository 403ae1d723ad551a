//! # Gatehouse
//!
//! `gatehouse` is an HTTP service that gates every request behind a single
//! globally admitted session. Sessions are tracked in an in-memory ledger of
//! two positionally paired columns (a session registry and a pending
//! admission queue); the head of the queue is the admitted session. A
//! deferred expiry timer retires the head after the configured maximum
//! session lifetime.
//!
//! Alongside the gate it carries the full account lifecycle: sign-up with
//! email verification, sign-in, session reset, verification-token re-issue,
//! and password recovery with a temporary password.
//!
//! Durable copies of session tokens are written through the [`store`]
//! abstraction off the request path; failures there are logged and never
//! affect the in-memory admission decision.

pub mod api;
pub mod cli;
pub mod gate;
pub mod password;
pub mod store;
pub mod tokens;
