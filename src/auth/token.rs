use serde::{Deserialize, Serialize};

/// The pair of bearer secrets the client persists.
///
/// Both halves are opaque strings; the access token happens to be a JWT but
/// nothing outside [`crate::auth::claims`] relies on that. The pair is always
/// read and written as a unit — see [`crate::auth::store::TokenStore`].
///
/// # Example
/// ```
/// use mindwell_api::auth::TokenPair;
///
/// let pair = TokenPair {
///     access_token: Some("access".to_string()),
///     refresh_token: Some("refresh".to_string()),
/// };
/// assert!(pair.has_session());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl TokenPair {
    /// Both an access token and a refresh token are present.
    pub fn has_session(&self) -> bool {
        self.access_token.is_some() && self.refresh_token.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

/// Partial write against a stored [`TokenPair`].
///
/// Each field is tri-state: left untouched, overwritten with a value, or
/// deleted. Fields never named by a builder call keep whatever the store
/// currently holds.
///
/// # Example
/// ```
/// use mindwell_api::auth::TokenUpdate;
///
/// // Overwrite the access token, delete the refresh token.
/// let update = TokenUpdate::new()
///     .access_token(Some("new-access"))
///     .refresh_token(None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TokenUpdate {
    access_token: Option<Option<String>>,
    refresh_token: Option<Option<String>>,
}

impl TokenUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the access token; `None` deletes the stored entry.
    pub fn access_token(mut self, value: Option<&str>) -> Self {
        self.access_token = Some(value.map(String::from));
        self
    }

    /// Set the refresh token; `None` deletes the stored entry.
    pub fn refresh_token(mut self, value: Option<&str>) -> Self {
        self.refresh_token = Some(value.map(String::from));
        self
    }

    /// Apply this update on top of an existing pair.
    pub fn apply(&self, pair: &mut TokenPair) {
        if let Some(access) = &self.access_token {
            pair.access_token = access.clone();
        }
        if let Some(refresh) = &self.refresh_token {
            pair.refresh_token = refresh.clone();
        }
    }
}
