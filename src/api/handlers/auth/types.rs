//! Request/response payloads for the auth endpoints.
//!
//! Field casing mirrors the wire format the existing clients already send
//! (`PascalCase` for signup/signin/resend, lowercase for recovery).

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::store::Role;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub organization: String,
    pub phone_number: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ResendVerificationRequest {
    #[serde(rename = "Email")]
    pub email: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RecoverPasswordRequest {
    pub email: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct VerifyEmailQuery {
    pub token: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;

    #[test]
    fn signup_request_uses_pascal_case_keys() -> Result<()> {
        let request: SignupRequest = serde_json::from_value(json!({
            "Name": "Alice",
            "Email": "alice@example.com",
            "Password": "hunter2",
            "Role": "User",
            "Organization": "Acme",
            "PhoneNumber": "555-0100",
        }))?;
        assert_eq!(request.email, "alice@example.com");
        assert_eq!(request.role, Role::User);
        Ok(())
    }

    #[test]
    fn signin_request_uses_pascal_case_keys() -> Result<()> {
        let request: SigninRequest = serde_json::from_value(json!({
            "Email": "alice@example.com",
            "Password": "hunter2",
        }))?;
        assert_eq!(request.password, "hunter2");
        Ok(())
    }

    #[test]
    fn recovery_request_uses_lowercase_email() -> Result<()> {
        let request: RecoverPasswordRequest =
            serde_json::from_value(json!({ "email": "bob@example.com" }))?;
        assert_eq!(request.email, "bob@example.com");
        Ok(())
    }

    #[test]
    fn unknown_role_is_rejected() {
        let result: Result<SignupRequest, _> = serde_json::from_value(json!({
            "Name": "Mallory",
            "Email": "m@example.com",
            "Password": "x",
            "Role": "Superuser",
            "Organization": "Acme",
            "PhoneNumber": "555-0100",
        }));
        assert!(result.is_err());
    }
}
