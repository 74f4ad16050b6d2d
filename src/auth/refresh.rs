use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::{BoxFuture, FutureExt, Shared};
use serde::{Deserialize, Serialize};

use super::error::AuthError;
use super::store::TokenStore;
use super::token::TokenUpdate;

type RefreshFuture = Shared<BoxFuture<'static, Result<String, AuthError>>>;

/// Single-flight coordinator for the refresh-token exchange.
///
/// However many callers ask at once, at most one exchange request is on the
/// wire; everyone waiting observes that one exchange's outcome. The slot is
/// claimed synchronously before any await, so there is no window between
/// "check if refreshing" and "start refreshing".
///
/// Uses its own plain `reqwest::Client` rather than the intercepted one, so
/// a failing exchange can never recursively trigger another refresh.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use mindwell_api::auth::{FileTokenStore, RefreshCoordinator};
///
/// let store = Arc::new(FileTokenStore::new_default());
/// let coordinator = RefreshCoordinator::new(store, "https://api.example.com/auth/refresh");
/// ```
#[derive(Clone)]
pub struct RefreshCoordinator {
    store: Arc<dyn TokenStore>,
    http: reqwest::Client,
    refresh_url: String,
    in_flight: Arc<Mutex<Option<RefreshFuture>>>,
}

impl RefreshCoordinator {
    pub fn new(store: Arc<dyn TokenStore>, refresh_url: impl Into<String>) -> Self {
        Self {
            store,
            http: reqwest::Client::new(),
            refresh_url: refresh_url.into(),
            in_flight: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// Joins the in-flight exchange if one exists; otherwise starts one. On
    /// success the new pair is already persisted when this returns. Failures
    /// are shared with every waiter and persist nothing.
    pub async fn refresh(&self) -> Result<String, AuthError> {
        let fut = {
            let mut slot = lock(&self.in_flight);
            match slot.as_ref() {
                Some(fut) => {
                    tracing::debug!("joining in-flight token refresh");
                    fut.clone()
                }
                None => {
                    let fut = self.start_exchange();
                    *slot = Some(fut.clone());
                    fut
                }
            }
        };
        fut.await
    }

    fn start_exchange(&self) -> RefreshFuture {
        let store = Arc::clone(&self.store);
        let http = self.http.clone();
        let url = self.refresh_url.clone();
        let slot = Arc::clone(&self.in_flight);
        async move {
            let outcome = exchange(store, http, url).await;
            // Release the slot whatever happened; the next caller starts
            // a fresh attempt.
            lock(&slot).take();
            outcome
        }
        .boxed()
        .shared()
    }
}

async fn exchange(
    store: Arc<dyn TokenStore>,
    http: reqwest::Client,
    url: String,
) -> Result<String, AuthError> {
    let refresh_token = store.load()?.refresh_token.ok_or(AuthError::NoRefreshToken)?;

    let response = http
        .post(&url)
        .json(&RefreshRequest {
            refresh_token: &refresh_token,
        })
        .send()
        .await?;
    let status = response.status();
    if !status.is_success() {
        tracing::warn!(status = status.as_u16(), "token refresh rejected");
        return Err(AuthError::RefreshRejected(status.as_u16()));
    }

    let payload: RefreshResponse = match response.json().await {
        Ok(payload) => payload,
        Err(err) if err.is_decode() => return Err(AuthError::InvalidRefreshResponse),
        Err(err) => return Err(err.into()),
    };
    let access = payload
        .access_token
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::InvalidRefreshResponse)?;
    // Server may rotate the refresh token; if it did not, keep ours.
    let rotated = payload.refresh_token.as_deref().unwrap_or(&refresh_token);

    store.save(
        &TokenUpdate::new()
            .access_token(Some(&access))
            .refresh_token(Some(rotated)),
    )?;
    tracing::debug!("access token refreshed");
    Ok(access)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Exchange request body: `POST <refresh-url> { "refresh_token": ... }`.
#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// Exchange response body. A missing `refresh_token` means "keep yours".
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
}
