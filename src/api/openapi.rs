use crate::api::handlers::{auth, health};
use utoipa::OpenApi;

/// `OpenAPI` document covering every routed endpoint except the undocumented
/// root page.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "gatehouse",
        description = "Request gating and token lifecycle for an HTTP application",
        license(name = "BSD-3-Clause", identifier = "BSD-3-Clause"),
    ),
    paths(
        health::health,
        auth::login::signin,
        auth::signup::signup,
        auth::session::reset_session,
        auth::verification::verify_email,
        auth::verification::resend_verification,
        auth::recovery::recover_password,
    ),
    components(schemas(
        health::Health,
        auth::types::SignupRequest,
        auth::types::SigninRequest,
        auth::types::ResendVerificationRequest,
        auth::types::RecoverPasswordRequest,
        auth::types::MessageResponse,
    )),
    tags(
        (name = "auth", description = "Sign-in, sign-up, session and password recovery"),
        (name = "verification", description = "Email verification tokens"),
        (name = "health", description = "Service health"),
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_covers_routed_paths() {
        let spec = openapi();
        for path in [
            "/health",
            "/signin",
            "/signup",
            "/reset-session",
            "/verify-email",
            "/resend-verification",
            "/recoverpass",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn openapi_tags_present() {
        let spec = openapi();
        let tags = spec.tags.clone().unwrap_or_default();
        assert!(tags.iter().any(|tag| tag.name == "auth"));
        assert!(tags.iter().any(|tag| tag.name == "verification"));
    }
}
