//! Error types for the Mindwell client.

use thiserror::Error;

use crate::auth::AuthError;

/// Primary error type for client operations.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The session is gone: an authenticated request failed with 401/403
    /// even after a refresh-and-retry cycle. Credentials have been cleared;
    /// the caller should route to login.
    #[error("Session expired (status {status})")]
    AuthFailure { status: u16 },

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    /// Whether this error means the stored session is no longer usable.
    pub fn is_session_ended(&self) -> bool {
        matches!(
            self,
            Self::AuthFailure { .. }
                | Self::Auth(
                    AuthError::NoRefreshToken
                        | AuthError::InvalidRefreshResponse
                        | AuthError::RefreshRejected(_)
                )
        )
    }
}

pub type Result<T, E = ApiError> = std::result::Result<T, E>;
