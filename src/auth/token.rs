//! Bearer token signing
//!
//! Uses HMAC-signed tokens carried in the Authorization header.
//! No server-side token storage needed.

use base64::{Engine as _, engine::general_purpose};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Token payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expires at (unix seconds)
    pub exp: i64,
}

impl Claims {
    pub fn is_expired(&self) -> bool {
        self.exp <= Utc::now().timestamp()
    }
}

/// Issues and verifies signed bearer tokens
#[derive(Clone)]
pub struct TokenIssuer {
    secret: Vec<u8>,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: impl Into<Vec<u8>>, ttl_seconds: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl: Duration::try_seconds(ttl_seconds).unwrap_or(Duration::MAX),
        }
    }

    /// Token lifetime in seconds, reported to clients as `expiresIn`
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// Create a signed token for `identity`
    ///
    /// Token format: base64(claims).base64(hmac_sha256(claims))
    pub fn issue_token(&self, identity: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now.checked_add_signed(self.ttl).ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!(
                "token ttl of {}s overflows the expiry timestamp",
                self.ttl.num_seconds()
            ))
        })?;
        let claims = Claims {
            sub: identity.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        self.sign(&claims)
    }

    /// Verify a token and return the identity it was issued for
    ///
    /// # Errors
    /// `Unauthorized` if the token is malformed, tampered with or expired
    pub fn verify_token(&self, token: &str) -> Result<String, AppError> {
        let (payload_b64, signature_b64) =
            token.split_once('.').ok_or(AppError::Unauthorized)?;

        let signature = general_purpose::URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| AppError::Unauthorized)?;
        self.mac()?
            .chain_update(payload_b64.as_bytes())
            .verify_slice(&signature)
            .map_err(|_| AppError::Unauthorized)?;

        let payload = general_purpose::URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| AppError::Unauthorized)?;
        let claims: Claims =
            serde_json::from_slice(&payload).map_err(|_| AppError::Unauthorized)?;

        if claims.is_expired() {
            return Err(AppError::Unauthorized);
        }

        Ok(claims.sub)
    }

    fn sign(&self, claims: &Claims) -> Result<String, AppError> {
        let payload = serde_json::to_vec(claims).map_err(|e| AppError::Internal(e.into()))?;
        let payload_b64 = general_purpose::URL_SAFE_NO_PAD.encode(payload);

        let signature = self
            .mac()?
            .chain_update(payload_b64.as_bytes())
            .finalize()
            .into_bytes();
        let signature_b64 = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        Ok(format!("{}.{}", payload_b64, signature_b64))
    }

    fn mac(&self) -> Result<HmacSha256, AppError> {
        HmacSha256::new_from_slice(&self.secret).map_err(|e| AppError::Internal(e.into()))
    }
}

/// Random 32-byte secret, used when none is configured
pub fn generate_secret() -> Vec<u8> {
    let mut secret = vec![0u8; 32];
    rand::thread_rng().fill_bytes(&mut secret);
    secret
}
