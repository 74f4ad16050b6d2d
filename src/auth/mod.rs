//! Token lifecycle: secure persistence, expiry inspection, and the
//! single-flight refresh exchange.

pub mod claims;
pub mod error;
pub mod refresh;
pub mod store;
pub mod token;

pub use claims::{decode_expiry, is_nearly_expired};
pub use error::AuthError;
pub use refresh::RefreshCoordinator;
pub use store::{FileTokenStore, TokenStore, TokenStoreConfig};
pub use token::{TokenPair, TokenUpdate};
