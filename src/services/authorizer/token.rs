//! Unverified token inspection and claim shapes.
//!
//! Nothing here trusts the token: it only extracts what is needed to pick a
//! verification key. Signature and claim checks live in `core`.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::Algorithm;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use super::errors::AuthorizationError;

/// Strip an optional `Bearer ` scheme from a raw header value.
pub fn strip_bearer(raw: &str) -> &str {
    let raw = raw.trim();
    raw.strip_prefix("Bearer ")
        .or_else(|| raw.strip_prefix("bearer "))
        .map(str::trim)
        .unwrap_or(raw)
}

/// Decode the header (no signature check) and return its `kid`.
///
/// The header algorithm must equal `expected`, so an attacker cannot pick a
/// weaker algorithm for the key we look up.
pub fn key_id(token: &str, expected: Algorithm) -> Result<String, AuthorizationError> {
    let segments = token.split('.').count();
    if segments != 3 {
        return Err(AuthorizationError::MalformedToken(format!(
            "expected 3 segments, found {}",
            segments
        )));
    }

    let header = jsonwebtoken::decode_header(token)
        .map_err(|e| AuthorizationError::MalformedToken(e.to_string()))?;

    if header.alg != expected {
        return Err(AuthorizationError::AlgorithmMismatch(format!(
            "{:?}",
            header.alg
        )));
    }

    header
        .kid
        .filter(|kid| !kid.trim().is_empty())
        .ok_or(AuthorizationError::MissingKeyId)
}

/// Short SHA-256 fingerprint for correlating a token in logs without logging it.
pub fn fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    URL_SAFE_NO_PAD.encode(&digest[..12])
}

/// Claims we read from a verified token.
///
/// `iss`, `aud` and `exp` are enforced by `jsonwebtoken::Validation`, so `aud`
/// is not kept here. `exp` must be an integer NumericDate: a fractional value
/// does not deserialize, so the token is denied as malformed.
/// `sub` stays loose so a non-string subject is a deny, not a parse error.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub sub: Option<serde_json::Value>,
    pub iss: String,
    pub exp: u64,
    #[serde(default)]
    pub scope: Option<String>,
}

impl TokenClaims {
    /// Non-empty string subject, if any.
    pub fn subject(&self) -> Option<&str> {
        match &self.sub {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s.as_str()),
            _ => None,
        }
    }
}
