use crate::{
    api::handlers::{auth, auth::GateConfig, health, root},
    api::email::EmailSender,
    gate::{admission_gate, ExpiryTimer, Gate, SessionLedger},
    password::PasswordHasher,
    store::UserStore,
    tokens::VerificationTokens,
};
use anyhow::Result;
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    middleware,
    routing::{get, post},
    Extension, Router,
};
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer, request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;

pub mod email;
pub mod handlers;
mod openapi;

pub use openapi::openapi;

/// Build the full router with its own gate wired in.
#[must_use]
pub fn app(
    config: &GateConfig,
    store: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordHasher>,
    mailer: Arc<dyn EmailSender>,
) -> Router {
    let ledger = Arc::new(SessionLedger::new());
    let timer = ExpiryTimer::new(
        ledger.clone(),
        Arc::clone(&store),
        Duration::from_secs(config.session_ttl_seconds()),
    );
    let gate = Arc::new(Gate::new(ledger, timer, Arc::clone(&store)));
    app_with_gate(gate, config, store, hasher, mailer)
}

/// Build the router around an externally owned gate, so callers can inspect
/// the ledger and timer while requests flow.
#[must_use]
pub fn app_with_gate(
    gate: Arc<Gate>,
    config: &GateConfig,
    store: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordHasher>,
    mailer: Arc<dyn EmailSender>,
) -> Router {
    let tokens = Arc::new(VerificationTokens::new(
        Arc::clone(&store),
        config.verification_ttl_seconds(),
    ));

    Router::new()
        .route("/", get(root::root))
        .route("/health", get(health::health))
        .route("/openapi.json", get(serve_openapi))
        .route(
            "/signin",
            get(auth::login::signin_page).post(auth::login::signin),
        )
        .route(
            "/signup",
            get(auth::signup::signup_page).post(auth::signup::signup),
        )
        .route("/reset-session", post(auth::session::reset_session))
        .route("/verify-email", get(auth::verification::verify_email))
        .route(
            "/resend-verification",
            post(auth::verification::resend_verification),
        )
        .route("/recoverpass", post(auth::recovery::recover_password))
        // Every route goes through the gate; the gate itself exempts the
        // verification and recovery paths.
        .layer(middleware::from_fn(admission_gate))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(CorsLayer::permissive())
                .layer(Extension(gate))
                .layer(Extension(store))
                .layer(Extension(hasher))
                .layer(Extension(mailer))
                .layer(Extension(tokens)),
        )
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(
    port: u16,
    config: &GateConfig,
    store: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordHasher>,
    mailer: Arc<dyn EmailSender>,
) -> Result<()> {
    let app = app(config, store, hasher, mailer);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

// Undocumented route serving the document itself; gated like any other
// non-exempt path.
async fn serve_openapi() -> axum::Json<utoipa::openapi::OpenApi> {
    axum::Json(openapi())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
