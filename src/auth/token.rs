//! Stateless admin credentials: an HMAC-signed claims payload exchanged for
//! the shared admin secret. Nothing is stored server-side, so a leaked token
//! stays valid until expiry; rotating the secret invalidates everything at
//! once.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Tokens are good for 24 hours from issuance.
pub const TOKEN_TTL_MS: i64 = 24 * 60 * 60 * 1000;

const SIGNING_KEY_SUFFIX: &str = "_secret_key";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid admin token")]
    InvalidAdminToken,
    #[error("token signing failed")]
    Signing,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    admin: bool,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in_ms: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub time_left_ms: i64,
}

pub struct TokenManager {
    admin_token: String,
    signing_key: String,
}

impl TokenManager {
    pub fn new(admin_token: impl Into<String>) -> Self {
        let admin_token = admin_token.into();
        let signing_key = format!("{}{}", admin_token, SIGNING_KEY_SUFFIX);
        Self {
            admin_token,
            signing_key,
        }
    }

    /// Exchange the shared admin secret for a signed, time-limited token.
    pub fn issue(&self, provided_secret: &str) -> Result<IssuedToken, AuthError> {
        if provided_secret != self.admin_token {
            return Err(AuthError::InvalidAdminToken);
        }

        let now = Utc::now().timestamp_millis();
        let claims = Claims {
            admin: true,
            iat: now,
            exp: now + TOKEN_TTL_MS,
        };
        let token = self.sign(&claims)?;
        Ok(IssuedToken {
            token,
            expires_in_ms: TOKEN_TTL_MS,
        })
    }

    /// Validate a token. Total: any malformed, tampered, expired or
    /// non-admin token yields `false`, with no indication of which check
    /// failed.
    pub fn verify(&self, token: &str) -> bool {
        self.verify_at(token, Utc::now().timestamp_millis())
    }

    /// Decode the payload segment for display purposes. Does not check the
    /// signature; callers wanting an authoritative answer use `verify`.
    pub fn inspect(&self, token: &str) -> Option<TokenInfo> {
        let payload_b64 = token.split('.').next()?;
        let payload = STANDARD.decode(payload_b64).ok()?;
        let claims: Claims = serde_json::from_slice(&payload).ok()?;
        let issued_at = DateTime::from_timestamp_millis(claims.iat)?;
        let expires_at = DateTime::from_timestamp_millis(claims.exp)?;
        Some(TokenInfo {
            issued_at,
            expires_at,
            time_left_ms: claims.exp - Utc::now().timestamp_millis(),
        })
    }

    /// Bearer check used on privileged routes: a signed token, or the raw
    /// shared secret for legacy direct-token clients.
    pub fn authorize_bearer(&self, bearer: &str) -> bool {
        self.is_raw_secret(bearer) || self.verify(bearer)
    }

    pub fn is_raw_secret(&self, bearer: &str) -> bool {
        bearer == self.admin_token
    }

    fn verify_at(&self, token: &str, now_ms: i64) -> bool {
        let mut parts = token.split('.');
        let (Some(payload_b64), Some(sig_hex), None) =
            (parts.next(), parts.next(), parts.next())
        else {
            return false;
        };

        let Ok(payload) = STANDARD.decode(payload_b64) else {
            return false;
        };
        let Ok(claims) = serde_json::from_slice::<Claims>(&payload) else {
            return false;
        };
        let Ok(signature) = hex::decode(sig_hex) else {
            return false;
        };

        let Ok(mut mac) = HmacSha256::new_from_slice(self.signing_key.as_bytes()) else {
            return false;
        };
        mac.update(&payload);
        if mac.verify_slice(&signature).is_err() {
            return false;
        }

        if now_ms > claims.exp {
            return false;
        }

        claims.admin
    }

    fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        let payload = serde_json::to_string(claims).map_err(|_| AuthError::Signing)?;
        let mut mac = HmacSha256::new_from_slice(self.signing_key.as_bytes())
            .map_err(|_| AuthError::Signing)?;
        mac.update(payload.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());
        Ok(format!("{}.{}", STANDARD.encode(payload), signature))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> TokenManager {
        TokenManager::new("super-secret")
    }

    #[test]
    fn issue_rejects_wrong_secret() {
        let result = manager().issue("not-the-secret");
        assert!(matches!(result, Err(AuthError::InvalidAdminToken)));
    }

    #[test]
    fn issued_token_verifies_within_ttl() {
        let manager = manager();
        let issued = manager.issue("super-secret").unwrap();
        assert_eq!(issued.expires_in_ms, TOKEN_TTL_MS);
        assert!(manager.verify(&issued.token));
    }

    #[test]
    fn expired_token_fails() {
        let manager = manager();
        let now = Utc::now().timestamp_millis();
        let claims = Claims {
            admin: true,
            iat: now - TOKEN_TTL_MS - 1000,
            exp: now - 1000,
        };
        let token = manager.sign(&claims).unwrap();
        assert!(!manager.verify(&token));
        // Same token was valid a moment before its expiry.
        assert!(manager.verify_at(&token, now - 2000));
    }

    #[test]
    fn non_admin_claim_fails() {
        let manager = manager();
        let now = Utc::now().timestamp_millis();
        let claims = Claims {
            admin: false,
            iat: now,
            exp: now + TOKEN_TTL_MS,
        };
        let token = manager.sign(&claims).unwrap();
        assert!(!manager.verify(&token));
    }

    #[test]
    fn tampered_payload_fails() {
        let manager = manager();
        let token = manager.issue("super-secret").unwrap().token;
        let (payload, signature) = token.split_once('.').unwrap();

        let mut bytes = STANDARD.decode(payload).unwrap();
        // Flip one byte of the serialized claims.
        bytes[0] ^= 0x01;
        let forged = format!("{}.{}", STANDARD.encode(bytes), signature);
        assert!(!manager.verify(&forged));
    }

    #[test]
    fn tampered_signature_fails() {
        let manager = manager();
        let token = manager.issue("super-secret").unwrap().token;
        let (payload, signature) = token.split_once('.').unwrap();

        let flipped: String = signature
            .char_indices()
            .map(|(i, c)| if i == 0 { if c == '0' { '1' } else { '0' } } else { c })
            .collect();
        assert!(!manager.verify(&format!("{}.{}", payload, flipped)));
    }

    #[test]
    fn malformed_tokens_fail_quietly() {
        let manager = manager();
        assert!(!manager.verify(""));
        assert!(!manager.verify("no-dot-here"));
        assert!(!manager.verify("a.b.c"));
        assert!(!manager.verify("!!!.deadbeef"));
        let garbage = format!("{}.nothex", STANDARD.encode("{\"admin\":true}"));
        assert!(!manager.verify(&garbage));
    }

    #[test]
    fn token_from_other_secret_fails() {
        let token = TokenManager::new("other-secret")
            .issue("other-secret")
            .unwrap()
            .token;
        assert!(!manager().verify(&token));
    }

    #[test]
    fn raw_secret_is_accepted_as_bearer_but_not_as_token() {
        let manager = manager();
        assert!(manager.authorize_bearer("super-secret"));
        assert!(!manager.verify("super-secret"));
        assert!(!manager.authorize_bearer("wrong"));
    }

    #[test]
    fn inspect_reports_claim_timestamps() {
        let manager = manager();
        let token = manager.issue("super-secret").unwrap().token;
        let info = manager.inspect(&token).unwrap();
        assert_eq!(
            info.expires_at - info.issued_at,
            chrono::Duration::milliseconds(TOKEN_TTL_MS)
        );
        assert!(info.time_left_ms > 0);
        assert!(manager.inspect("not a token").is_none());
    }
}
