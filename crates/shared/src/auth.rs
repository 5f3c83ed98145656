//! Identity and session types exchanged with the auth provider.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AppError;

/// A user record as returned by the identity provider.
///
/// Only `id` is interpreted; every other field is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// Provider-assigned unique user ID.
    pub id: String,
    /// E-mail address, when the provider exposes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Remaining provider fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Identity {
    /// Creates an identity with only an ID and e-mail.
    #[must_use]
    pub fn new(id: impl Into<String>, email: Option<String>) -> Self {
        Self {
            id: id.into(),
            email,
            extra: Map::new(),
        }
    }
}

/// A login session issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token for subsequent requests.
    pub access_token: String,
    /// Token type, normally `bearer`.
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Access token lifetime in seconds.
    #[serde(default)]
    pub expires_in: i64,
    /// Absolute expiry as a unix timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    /// Refresh token.
    #[serde(default)]
    pub refresh_token: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Result of a signup or password sign-in.
///
/// `session` is `None` when the provider created the account but still
/// requires e-mail confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    /// The authenticated (or newly created) user.
    pub user: Identity,
    /// Session tokens, if one was issued.
    pub session: Option<Session>,
}

/// Signup and login request payload.
///
/// Both fields are optional at the wire level so that missing values can be
/// reported as a 400 instead of a deserialization rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    /// User email.
    #[serde(default)]
    pub email: Option<String>,
    /// User password.
    #[serde(default)]
    pub password: Option<String>,
}

impl Credentials {
    /// Returns `(email, password)` when both are present and non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BadRequest`] if either field is missing or empty.
    pub fn require(&self) -> Result<(&str, &str), AppError> {
        match (self.email.as_deref(), self.password.as_deref()) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                Ok((email, password))
            }
            _ => Err(AppError::BadRequest(
                "Email and password are required".to_string(),
            )),
        }
    }
}
