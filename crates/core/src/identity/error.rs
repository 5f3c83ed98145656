//! Identity gateway error types.

use thiserror::Error;

/// Identity gateway errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The provider answered and refused the request.
    #[error("identity provider rejected request ({status}): {message}")]
    Rejected {
        /// HTTP status returned by the provider.
        status: u16,
        /// Provider's error message.
        message: String,
    },

    /// The provider could not be reached.
    #[error("identity provider unreachable: {0}")]
    Transport(String),

    /// The provider answered with something we could not parse.
    #[error("invalid identity provider response: {0}")]
    InvalidResponse(String),

    /// Client misconfiguration.
    #[error("identity provider configuration error: {0}")]
    Configuration(String),
}

impl GatewayError {
    /// Create a rejected error.
    #[must_use]
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Message suitable for the end user.
    ///
    /// The provider's own wording is passed through for rejections; transport
    /// and parsing problems get a fixed sentence.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Rejected { message, .. } => message,
            Self::Transport(_) | Self::InvalidResponse(_) | Self::Configuration(_) => {
                "Authentication service unavailable"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message() {
        assert_eq!(
            GatewayError::rejected(400, "Invalid login credentials").user_message(),
            "Invalid login credentials"
        );
        assert_eq!(
            GatewayError::Transport("dns error: no such host".into()).user_message(),
            "Authentication service unavailable"
        );
    }
}
