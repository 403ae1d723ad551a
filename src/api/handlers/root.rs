use axum::response::IntoResponse;

// axum handler for the application root, reachable only through the gate
pub async fn root() -> impl IntoResponse {
    "Welcome"
}
