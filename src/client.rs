//! HTTP client with the token-lifecycle pipeline wired in.
//!
//! Every request goes out with a valid bearer token when one can be had:
//! the access token is refreshed ahead of expiry, and an unexpected 401/403
//! triggers exactly one refresh-and-retry cycle before the session is
//! declared ended.

use std::sync::Arc;

use reqwest::{Method, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;

use crate::auth::claims::is_nearly_expired;
use crate::auth::refresh::RefreshCoordinator;
use crate::auth::store::TokenStore;
use crate::auth::token::{TokenPair, TokenUpdate};
use crate::config::ClientConfig;
use crate::error::{ApiError, Result};

/// Authenticated API client.
///
/// Callers never attach auth headers themselves; the client owns the token
/// store and the refresh coordinator and threads the bearer token through
/// every request.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use mindwell_api::auth::FileTokenStore;
/// use mindwell_api::client::ApiClient;
/// use mindwell_api::config::ClientConfig;
///
/// # async fn example() -> mindwell_api::error::Result<()> {
/// let store = Arc::new(FileTokenStore::new_default());
/// let client = ApiClient::new(ClientConfig::new("https://api.example.com"), store)?;
/// let response = client.get("/mood-entries").await?;
/// # Ok(())
/// # }
/// ```
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    store: Arc<dyn TokenStore>,
    refresh: RefreshCoordinator,
}

impl ApiClient {
    pub fn new(config: ClientConfig, store: Arc<dyn TokenStore>) -> Result<Self> {
        let http = build_http(&config)?;
        // The coordinator gets its own client so the exchange call is never
        // itself intercepted.
        let refresh = RefreshCoordinator::new(Arc::clone(&store), config.refresh_url())
            .with_http_client(build_http(&config)?);
        Ok(Self {
            http,
            config,
            store,
            refresh,
        })
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        self.execute(Method::GET, path, None).await
    }

    pub async fn delete(&self, path: &str) -> Result<Response> {
        self.execute(Method::DELETE, path, None).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        self.execute(Method::POST, path, Some(serde_json::to_value(body)?))
            .await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        self.execute(Method::PUT, path, Some(serde_json::to_value(body)?))
            .await
    }

    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        self.execute(Method::PATCH, path, Some(serde_json::to_value(body)?))
            .await
    }

    /// Read the persisted token pair.
    pub fn tokens(&self) -> Result<TokenPair> {
        Ok(self.store.load()?)
    }

    /// Persist a partial token update (e.g. after login).
    pub fn set_tokens(&self, update: &TokenUpdate) -> Result<()> {
        Ok(self.store.save(update)?)
    }

    /// Clear both stored secrets. Does not navigate or notify anyone; the
    /// surrounding app observes the absent session.
    pub fn logout(&self) -> Result<()> {
        Ok(self.store.clear()?)
    }

    /// Run one request through the pipeline.
    ///
    /// The body is pre-serialized by the verb methods so the retried send is
    /// byte-for-byte the original request. Retry happens at most once and
    /// only here, so no retry marker needs to travel with the request.
    async fn execute(&self, method: Method, path: &str, body: Option<Value>) -> Result<Response> {
        let url = format!("{}{}", self.config.base_url, path);
        let bearer = self.prepare_bearer().await?;
        let response = self
            .send(method.clone(), &url, body.as_ref(), bearer.as_deref())
            .await?;
        let status = response.status();
        if !is_auth_failure(status) || self.is_exempt(path) {
            return Ok(response);
        }

        tracing::warn!(
            status = status.as_u16(),
            path,
            "auth failure, refreshing and retrying once"
        );
        let token = match self.refresh.refresh().await {
            Ok(token) => token,
            Err(err) => {
                self.store.clear()?;
                return Err(err.into());
            }
        };
        let retried = self
            .send(method, &url, body.as_ref(), Some(&token))
            .await?;
        let retried_status = retried.status();
        if is_auth_failure(retried_status) {
            self.store.clear()?;
            return Err(ApiError::AuthFailure {
                status: retried_status.as_u16(),
            });
        }
        Ok(retried)
    }

    /// Decide which bearer token the request goes out with.
    ///
    /// With a full session and a nearly-expired access token, refresh first.
    /// If that refresh fails the session is cleared and the request still
    /// goes out unauthenticated; it will fail downstream, which keeps a
    /// single failure path for the caller.
    async fn prepare_bearer(&self) -> Result<Option<String>> {
        let pair = self.store.load()?;
        if pair.has_session()
            && is_nearly_expired(pair.access_token.as_deref(), self.config.expiry_buffer)
        {
            match self.refresh.refresh().await {
                Ok(token) => return Ok(Some(token)),
                Err(err) => {
                    tracing::warn!(error = %err, "proactive refresh failed, clearing session");
                    self.store.clear()?;
                    return Ok(None);
                }
            }
        }
        Ok(pair.access_token)
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        bearer: Option<&str>,
    ) -> Result<Response> {
        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        Ok(request.send().await?)
    }

    fn is_exempt(&self, path: &str) -> bool {
        path.contains(&self.config.auth_marker)
    }
}

fn build_http(config: &ClientConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|err| ApiError::Configuration(err.to_string()))
}

fn is_auth_failure(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}
