//! Supabase auth (GoTrue) REST client.

use async_trait::async_trait;
use reqwest::{RequestBuilder, Url};
use serde_json::{Value, json};
use tracing::debug;

use super::{GatewayError, IdentityGateway};
use depot_shared::{AuthSession, Identity, Session};

/// Identity gateway backed by a Supabase project's auth API.
///
/// Every call carries the service key in the `apikey` header.
#[derive(Clone)]
pub struct SupabaseAuthClient {
    http: reqwest::Client,
    auth_url: String,
    api_key: String,
}

impl SupabaseAuthClient {
    /// Creates a client for the project at `project_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be built.
    pub fn new(project_url: &str, api_key: impl Into<String>) -> Result<Self, GatewayError> {
        let parsed = Url::parse(project_url)
            .map_err(|e| GatewayError::Configuration(format!("invalid project URL: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(GatewayError::Configuration(format!(
                "unsupported URL scheme: {}",
                parsed.scheme()
            )));
        }

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| GatewayError::Configuration(e.to_string()))?;

        Ok(Self {
            http,
            auth_url: format!("{}/auth/v1", project_url.trim_end_matches('/')),
            api_key: api_key.into(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.auth_url)
    }

    async fn send(&self, req: RequestBuilder) -> Result<Value, GatewayError> {
        let response = req
            .header("apikey", &self.api_key)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if !status.is_success() {
            debug!(status = status.as_u16(), "auth provider returned an error");
            return Err(GatewayError::rejected(
                status.as_u16(),
                extract_error_message(&body),
            ));
        }

        serde_json::from_str(&body).map_err(|e| GatewayError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl IdentityGateway for SupabaseAuthClient {
    async fn resolve_user(&self, token: &str) -> Result<Identity, GatewayError> {
        let value = self
            .send(self.http.get(self.endpoint("user")).bearer_auth(token))
            .await?;
        serde_json::from_value(value).map_err(|e| GatewayError::InvalidResponse(e.to_string()))
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, GatewayError> {
        let value = self
            .send(
                self.http
                    .post(self.endpoint("signup"))
                    .json(&json!({ "email": email, "password": password })),
            )
            .await?;
        parse_auth_response(value)
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, GatewayError> {
        let value = self
            .send(
                self.http
                    .post(self.endpoint("token"))
                    .query(&[("grant_type", "password")])
                    .json(&json!({ "email": email, "password": password })),
            )
            .await?;

        let auth = parse_auth_response(value)?;
        if auth.session.is_none() {
            return Err(GatewayError::InvalidResponse(
                "password grant returned no session".to_string(),
            ));
        }
        Ok(auth)
    }
}

/// Splits an auth response into user and session.
///
/// Session-shaped bodies carry `access_token` and a nested `user`; anything
/// else is a bare user record (signup pending e-mail confirmation).
fn parse_auth_response(value: Value) -> Result<AuthSession, GatewayError> {
    let invalid = |e: serde_json::Error| GatewayError::InvalidResponse(e.to_string());

    if value.get("access_token").is_some() {
        let user = value
            .get("user")
            .cloned()
            .ok_or_else(|| GatewayError::InvalidResponse("session without user".to_string()))?;
        let user: Identity = serde_json::from_value(user).map_err(invalid)?;
        let session: Session = serde_json::from_value(value).map_err(invalid)?;
        Ok(AuthSession {
            user,
            session: Some(session),
        })
    } else {
        let user: Identity = serde_json::from_value(value).map_err(invalid)?;
        Ok(AuthSession {
            user,
            session: None,
        })
    }
}

/// Pulls a human-readable message out of an auth error body.
fn extract_error_message(body: &str) -> String {
    const KEYS: [&str; 4] = ["msg", "error_description", "message", "error"];

    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(msg) = KEYS
            .iter()
            .find_map(|k| value.get(*k).and_then(Value::as_str))
        {
            return msg.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Unknown error".to_string()
    } else {
        trimmed.to_string()
    }
}
