use std::fmt;

use thiserror::Error;

use crate::services::jwks::KeyLookupError;

/// Fatal misconfiguration. Never produced per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for EnvironmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvironmentError::Missing(key) => write!(f, "missing env variable: {}", key),
            EnvironmentError::Invalid(key) => write!(f, "invalid env variable: {}", key),
        }
    }
}

impl std::error::Error for EnvironmentError {}

/// Per-request authorization failure. Always rendered as an explicit deny.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    #[error("malformed token: {0}")]
    MalformedToken(String),
    #[error("token header has no key id")]
    MissingKeyId,
    #[error("unexpected token algorithm: {0}")]
    AlgorithmMismatch(String),
    #[error("signing key lookup failed: {0}")]
    KeyLookup(#[from] KeyLookupError),
    #[error("invalid signature")]
    InvalidSignature,
    #[error("audience mismatch")]
    InvalidAudience,
    #[error("issuer mismatch")]
    InvalidIssuer,
    #[error("token expired")]
    Expired,
    #[error("token not yet valid")]
    Immature,
    #[error("missing required claim: {0}")]
    MissingClaim(String),
    #[error("token has no usable subject")]
    MissingSubject,
    #[error("token verification failed: {0}")]
    Verification(String),
}

impl AuthorizationError {
    /// Stable machine-readable code for logs and the deny context.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedToken(_) => "malformed_token",
            Self::MissingKeyId => "missing_kid",
            Self::AlgorithmMismatch(_) => "algorithm_mismatch",
            Self::KeyLookup(KeyLookupError::NotFound(_)) => "unknown_key",
            Self::KeyLookup(KeyLookupError::Timeout(_)) => "jwks_timeout",
            Self::KeyLookup(KeyLookupError::RateLimited) => "jwks_rate_limited",
            Self::KeyLookup(KeyLookupError::Source(_)) => "jwks_unavailable",
            Self::InvalidSignature => "invalid_signature",
            Self::InvalidAudience => "invalid_audience",
            Self::InvalidIssuer => "invalid_issuer",
            Self::Expired => "token_expired",
            Self::Immature => "token_immature",
            Self::MissingClaim(_) => "missing_claim",
            Self::MissingSubject => "missing_subject",
            Self::Verification(_) => "verification_failed",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthorizationError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::InvalidAudience => Self::InvalidAudience,
            ErrorKind::InvalidIssuer => Self::InvalidIssuer,
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::ImmatureSignature => Self::Immature,
            ErrorKind::InvalidAlgorithm => Self::AlgorithmMismatch(e.to_string()),
            ErrorKind::MissingRequiredClaim(claim) => Self::MissingClaim(claim.clone()),
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => Self::MalformedToken(e.to_string()),
            _ => Self::Verification(e.to_string()),
        }
    }
}
