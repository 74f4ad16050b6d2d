//! Client configuration.

use std::time::Duration;

/// Configuration for [`crate::client::ApiClient`].
///
/// Only the base URL is required; the defaults mirror the Mindwell backend
/// contract (refresh exchange at `/auth/refresh`, auth endpoints exempt from
/// retry under `/auth/`).
///
/// # Example
/// ```
/// use std::time::Duration;
/// use mindwell_api::config::ClientConfig;
///
/// let config = ClientConfig::new("https://api.example.com")
///     .with_timeout(Duration::from_secs(10))
///     .with_expiry_buffer(Duration::from_secs(60));
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL all request paths are joined onto, without a trailing slash.
    pub base_url: String,
    /// Path of the refresh-token exchange endpoint.
    pub refresh_path: String,
    /// Paths containing this marker never trigger refresh-and-retry on 401,
    /// keeping the login/refresh calls themselves out of the loop.
    pub auth_marker: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Refresh ahead of expiry when the access token has less than this left.
    pub expiry_buffer: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            refresh_path: "/auth/refresh".to_string(),
            auth_marker: "/auth/".to_string(),
            timeout: Duration::from_secs(15),
            expiry_buffer: Duration::from_secs(30),
        }
    }

    pub fn with_refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = path.into();
        self
    }

    pub fn with_auth_marker(mut self, marker: impl Into<String>) -> Self {
        self.auth_marker = marker.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_expiry_buffer(mut self, buffer: Duration) -> Self {
        self.expiry_buffer = buffer;
        self
    }

    /// Absolute URL of the refresh exchange endpoint.
    pub fn refresh_url(&self) -> String {
        format!("{}{}", self.base_url, self.refresh_path)
    }
}
