//! The module contains the authenticated user and the account endpoints.

use axum::{Json, http::StatusCode};
use serde::Serialize;

/// The user resolved by the auth middleware, available to handlers as an
/// `Extension`.
#[derive(Clone, Debug)]
pub struct AuthUser(pub engine::User);

impl AuthUser {
    pub fn username(&self) -> &str {
        &self.0.username
    }
}

#[derive(Serialize)]
pub struct SignupClosed {
    error: &'static str,
}

/// Self-service signup is closed: accounts are provisioned through the
/// admin CLI.
pub async fn signup() -> (StatusCode, Json<SignupClosed>) {
    tracing::debug!("rejected signup attempt");
    (
        StatusCode::FORBIDDEN,
        Json(SignupClosed {
            error: "signup is closed",
        }),
    )
}
