use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::JwksConfig;

/// Build the JWKS URI for an issuer: `<issuer>/.well-known/jwks.json`.
///
/// A trailing slash on the issuer is dropped so the path has exactly one `/`.
pub fn jwks_uri(issuer: &str) -> String {
    format!("{}/.well-known/jwks.json", issuer.trim_end_matches('/'))
}

#[derive(Debug, Error)]
pub enum KeySourceError {
    #[error("jwks client error: {0}")]
    Client(String),
    #[error("jwks endpoint unreachable: {0}")]
    Unreachable(String),
    #[error("jwks endpoint returned status {0}")]
    Status(StatusCode),
    #[error("invalid jwks document: {0}")]
    InvalidBody(String),
}

impl KeySourceError {
    /// Network-level failures worth one retry. Bad documents never are.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Unreachable(_) => true,
            Self::Status(status) => status.is_server_error(),
            Self::Client(_) | Self::InvalidBody(_) => false,
        }
    }
}

/// Something that can produce the issuer's current key set.
///
/// Implementations must be safe to call concurrently.
#[async_trait]
pub trait KeySource: Send + Sync + 'static {
    // Fetch the whole key set. No caching here; `KeyCache` owns that.
    async fn fetch_key_set(&self) -> Result<JwkSet, KeySourceError>;

    // Short description for logs.
    fn describe(&self) -> String;
}

/// Fetches the key set over HTTP(S) with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpJwksSource {
    uri: String,
    client: reqwest::Client,
    retry_backoff: std::time::Duration,
}

impl HttpJwksSource {
    pub fn new(uri: impl Into<String>, config: &JwksConfig) -> Result<Self, KeySourceError> {
        let client = reqwest::Client::builder()
            .timeout(config.lookup_timeout)
            .build()
            .map_err(|e| KeySourceError::Client(e.to_string()))?;

        Ok(Self {
            uri: uri.into(),
            client,
            retry_backoff: config.retry_backoff,
        })
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    async fn fetch_once(&self) -> Result<JwkSet, KeySourceError> {
        let response = self.client.get(&self.uri).send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() || e.is_request() {
                KeySourceError::Unreachable(e.to_string())
            } else {
                KeySourceError::Client(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(KeySourceError::Status(status));
        }

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| KeySourceError::InvalidBody(e.to_string()))
    }
}

#[async_trait]
impl KeySource for HttpJwksSource {
    async fn fetch_key_set(&self) -> Result<JwkSet, KeySourceError> {
        debug!(jwks_uri = %self.uri, "fetching jwks");

        let jwks = match self.fetch_once().await {
            Ok(jwks) => jwks,
            Err(err) if err.is_transient() => {
                warn!(
                    jwks_uri = %self.uri,
                    error = %err,
                    backoff_ms = self.retry_backoff.as_millis() as u64,
                    "jwks fetch failed, retrying once"
                );
                tokio::time::sleep(self.retry_backoff).await;
                self.fetch_once().await?
            }
            Err(err) => return Err(err),
        };

        info!(jwks_uri = %self.uri, key_count = jwks.keys.len(), "fetched jwks");
        Ok(jwks)
    }

    fn describe(&self) -> String {
        self.uri.clone()
    }
}
