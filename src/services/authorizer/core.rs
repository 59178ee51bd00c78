use std::collections::BTreeMap;

use jsonwebtoken::{Algorithm, Validation};
use tracing::{info, warn};

use super::decision::Decision;
use super::errors::{AuthorizationError, EnvironmentError};
use super::token::{self, TokenClaims};
use crate::services::jwks::KeyCache;

/// What a token must match. Injected by the caller; nothing reads env here.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub audience: String,
    // Compared verbatim with `iss`, trailing slash included.
    pub issuer: String,
    pub algorithm: Algorithm,
    pub leeway_seconds: u64,
}

impl AuthConfig {
    pub fn new(audience: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self {
            audience: audience.into(),
            issuer: issuer.into(),
            algorithm: Algorithm::RS256,
            leeway_seconds: 60,
        }
    }

    pub fn validate(&self) -> Result<(), EnvironmentError> {
        if self.audience.trim().is_empty() {
            return Err(EnvironmentError::Missing("JWT_AUDIENCE"));
        }
        if self.issuer.trim().is_empty() {
            return Err(EnvironmentError::Missing("JWT_ISSUER"));
        }
        if url::Url::parse(&self.issuer).is_err() {
            return Err(EnvironmentError::Invalid("JWT_ISSUER"));
        }
        if !is_asymmetric(self.algorithm) {
            return Err(EnvironmentError::Invalid("JWT_ALGORITHM"));
        }
        Ok(())
    }
}

fn is_asymmetric(alg: Algorithm) -> bool {
    !matches!(alg, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)
}

/// Identity extracted from a token that passed every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub subject: String,
    pub issuer: String,
    pub key_id: String,
    pub expires_at: u64,
    pub scope: Option<String>,
}

impl VerifiedToken {
    fn context(&self) -> BTreeMap<String, String> {
        let mut context = BTreeMap::from([
            ("sub".to_string(), self.subject.clone()),
            ("iss".to_string(), self.issuer.clone()),
            ("kid".to_string(), self.key_id.clone()),
        ]);
        if let Some(scope) = &self.scope {
            context.insert("scope".to_string(), scope.clone());
        }
        context
    }
}

/// JWT bearer authorizer backed by a JWKS key cache.
pub struct Authorizer {
    config: AuthConfig,
    keys: KeyCache,
    validation: Validation,
}

impl std::fmt::Debug for Authorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authorizer")
            .field("config", &self.config)
            .field("keys", &self.keys)
            .finish()
    }
}

impl Authorizer {
    /// Fails on incomplete configuration before any key is fetched.
    pub fn new(config: AuthConfig, keys: KeyCache) -> Result<Self, EnvironmentError> {
        config.validate()?;

        let mut validation = Validation::new(config.algorithm);
        validation.set_audience(&[config.audience.as_str()]);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.validate_nbf = true;
        validation.leeway = config.leeway_seconds;

        Ok(Self {
            config,
            keys,
            validation,
        })
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn keys(&self) -> &KeyCache {
        &self.keys
    }

    /// Verify signature + claims.
    ///
    /// Order: header `kid` (unverified) → key lookup → signature, `aud`, `iss`,
    /// `exp`/`nbf` → non-empty string `sub`.
    pub async fn verify(&self, raw: &str) -> Result<VerifiedToken, AuthorizationError> {
        let token = token::strip_bearer(raw);
        let kid = token::key_id(token, self.config.algorithm)?;
        let key = self.keys.signing_key(&kid).await?;

        let data = jsonwebtoken::decode::<TokenClaims>(token, &key, &self.validation)?;
        let claims = data.claims;

        let subject = claims
            .subject()
            .ok_or(AuthorizationError::MissingSubject)?
            .to_string();

        Ok(VerifiedToken {
            subject,
            issuer: claims.iss,
            key_id: kid,
            expires_at: claims.exp,
            scope: claims.scope,
        })
    }

    /// Always yields a decision. Failures become `Decision::Deny`.
    pub async fn authorize(&self, raw: &str) -> Decision {
        let fingerprint = token::fingerprint(token::strip_bearer(raw));

        match self.verify(raw).await {
            Ok(verified) => {
                let expires_at = chrono::DateTime::from_timestamp(verified.expires_at as i64, 0)
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_default();

                info!(
                    sub = %verified.subject,
                    iss = %verified.issuer,
                    kid = %verified.key_id,
                    scope = verified.scope.as_deref().unwrap_or(""),
                    %expires_at,
                    token = %fingerprint,
                    "token authorized"
                );

                Decision::Allow {
                    context: verified.context(),
                    principal_id: verified.subject,
                }
            }
            Err(reason) => {
                warn!(
                    reason = reason.code(),
                    error = %reason,
                    token = %fingerprint,
                    "token denied"
                );
                Decision::deny(reason)
            }
        }
    }
}
