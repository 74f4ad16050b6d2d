use thiserror::Error;

/// Errors from token storage and the refresh exchange.
///
/// `Clone` so a single refresh outcome can be handed to every caller waiting
/// on the same in-flight exchange.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("No refresh token available")]
    NoRefreshToken,
    #[error("Refresh response missing access token")]
    InvalidRefreshResponse,
    #[error("Refresh request rejected with status {0}")]
    RefreshRejected(u16),
    #[error("Network error: {0}")]
    Network(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}

impl From<std::io::Error> for AuthError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

impl From<toml::de::Error> for AuthError {
    fn from(error: toml::de::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

impl From<toml::ser::Error> for AuthError {
    fn from(error: toml::ser::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}
