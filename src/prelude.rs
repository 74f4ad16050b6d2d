//! Convenience re-exports for common use.

pub use crate::auth::{
    AuthError, FileTokenStore, RefreshCoordinator, TokenPair, TokenStore, TokenStoreConfig,
    TokenUpdate,
};
pub use crate::client::ApiClient;
pub use crate::config::ClientConfig;
pub use crate::error::{ApiError, Result};
