//! Local JWT expiry inspection.
//!
//! Decodes the `exp` claim from an access token's payload segment without
//! verifying the signature. This is a heuristic for deciding when to refresh
//! ahead of a 401, not an authorization check.

use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Claims {
    exp: Option<i64>,
}

/// Extract the `exp` claim (Unix seconds) from a JWT, if it has one.
///
/// Returns `None` on any malformation: wrong segment count, bad base64url,
/// invalid JSON, or a missing claim. Never panics.
pub fn decode_expiry(token: &str) -> Option<i64> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;
    claims.exp
}

/// Whether the token is expired or will expire within `buffer`.
///
/// Absence of proof of freshness counts as staleness: a missing token or an
/// undecodable `exp` yields `true`. Callers must not "fix" this into an
/// error path; it is the fail-closed contract the pipeline relies on.
pub fn is_nearly_expired(token: Option<&str>, buffer: Duration) -> bool {
    let Some(token) = token else {
        return true;
    };
    let Some(exp) = decode_expiry(token) else {
        return true;
    };
    let now = chrono::Utc::now().timestamp();
    exp - now <= buffer.as_secs() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt_with_payload(payload: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.as_bytes());
        format!("{header}.{body}.sig")
    }

    fn jwt_with_exp(exp: i64) -> String {
        jwt_with_payload(&format!(r#"{{"exp":{exp}}}"#))
    }

    const BUFFER: Duration = Duration::from_secs(30);

    #[test]
    fn missing_token_is_nearly_expired() {
        assert!(is_nearly_expired(None, BUFFER));
    }

    #[test]
    fn empty_token_is_nearly_expired() {
        assert!(is_nearly_expired(Some(""), BUFFER));
    }

    #[test]
    fn token_without_separator_is_nearly_expired() {
        assert!(is_nearly_expired(Some("not-a-jwt"), BUFFER));
    }

    #[test]
    fn token_with_non_json_payload_is_nearly_expired() {
        let token = jwt_with_payload("definitely not json");
        assert!(is_nearly_expired(Some(&token), BUFFER));
    }

    #[test]
    fn token_without_exp_claim_is_nearly_expired() {
        let token = jwt_with_payload(r#"{"sub":"user-1"}"#);
        assert!(is_nearly_expired(Some(&token), BUFFER));
    }

    #[test]
    fn expired_token_is_nearly_expired() {
        let token = jwt_with_exp(chrono::Utc::now().timestamp() - 60);
        assert!(is_nearly_expired(Some(&token), BUFFER));
    }

    #[test]
    fn token_expiring_inside_buffer_is_nearly_expired() {
        let token = jwt_with_exp(chrono::Utc::now().timestamp() + 10);
        assert!(is_nearly_expired(Some(&token), BUFFER));
    }

    #[test]
    fn token_expiring_well_past_buffer_is_fresh() {
        let token = jwt_with_exp(chrono::Utc::now().timestamp() + 3600);
        assert!(!is_nearly_expired(Some(&token), BUFFER));
    }

    #[test]
    fn decode_expiry_reads_the_claim() {
        assert_eq!(decode_expiry(&jwt_with_exp(1_700_000_000)), Some(1_700_000_000));
        assert_eq!(decode_expiry("garbage"), None);
    }
}
