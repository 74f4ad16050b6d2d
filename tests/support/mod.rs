#![allow(dead_code)]

use std::sync::Mutex;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use mindwell_api::auth::{AuthError, TokenPair, TokenStore, TokenUpdate};

#[derive(Default)]
pub struct InMemoryTokenStore {
    pair: Mutex<TokenPair>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, access: Option<&str>, refresh: Option<&str>) {
        *self.pair.lock().expect("store lock poisoned") = TokenPair {
            access_token: access.map(String::from),
            refresh_token: refresh.map(String::from),
        };
    }

    pub fn snapshot(&self) -> TokenPair {
        self.pair.lock().expect("store lock poisoned").clone()
    }
}

impl TokenStore for InMemoryTokenStore {
    fn load(&self) -> Result<TokenPair, AuthError> {
        Ok(self.snapshot())
    }

    fn save(&self, update: &TokenUpdate) -> Result<(), AuthError> {
        let mut pair = self.pair.lock().expect("store lock poisoned");
        update.apply(&mut pair);
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        *self.pair.lock().expect("store lock poisoned") = TokenPair::default();
        Ok(())
    }
}

/// Unsigned JWT whose `exp` claim is `exp` Unix seconds.
pub fn jwt_with_exp(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{exp}}}"#).as_bytes());
    format!("{header}.{payload}.test-signature")
}

/// Unsigned JWT expiring `secs` seconds from now (negative for already expired).
pub fn jwt_expiring_in(secs: i64) -> String {
    jwt_with_exp(chrono::Utc::now().timestamp() + secs)
}
