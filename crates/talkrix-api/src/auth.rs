use serde::Serialize;
use talkrix_core::models::AuthResponse;

use crate::client::ApiClient;
use crate::client::ApiResult;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

impl ApiClient {
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<AuthResponse> {
        self.post_public("/auth/login", &LoginRequest { email, password })
            .await
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> ApiResult<AuthResponse> {
        self.post_public(
            "/auth/register",
            &RegisterRequest {
                name,
                email,
                password,
            },
        )
        .await
    }

    /// Records server-side that the onboarding tour was finished. Callers
    /// treat failure as non-fatal.
    pub async fn complete_tour(&self) -> ApiResult<()> {
        self.post_empty("/auth/complete-tour", &serde_json::json!({}))
            .await
    }
}
