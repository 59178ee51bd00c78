use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use jsonwebtoken::DecodingKey;
use jsonwebtoken::jwk::{JwkSet, PublicKeyUse};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use super::JwksConfig;
use super::rate_limit::LookupRateLimiter;
use super::source::KeySource;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyLookupError {
    #[error("no signing key with kid {0:?}")]
    NotFound(String),
    #[error("jwks lookup timed out after {0:?}")]
    Timeout(Duration),
    #[error("jwks lookup rate limited")]
    RateLimited,
    #[error("{0}")]
    Source(String),
}

#[derive(Clone)]
struct CachedKey {
    key: DecodingKey,
    fetched_at: Instant,
}

impl CachedKey {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

#[derive(Default)]
struct KeyState {
    keys: HashMap<String, CachedKey>,
    // When the last successful fetch finished.
    refreshed_at: Option<Instant>,
}

/// Signing keys by kid.
///
/// Eviction: entries older than `cache_ttl` are refetched; each successful
/// fetch replaces the whole map, so keys dropped from the issuer's set go away.
/// `requests_per_minute` caps outbound fetches; when the cap is hit a stale
/// entry is served if one exists.
///
/// Concurrent misses share one fetch: callers queue on `refill`, and a caller
/// that waited through a completed fetch answers from its result without
/// spending another rate-limit slot.
pub struct KeyCache {
    source: Arc<dyn KeySource>,
    state: RwLock<KeyState>,
    refill: Mutex<()>,
    limiter: LookupRateLimiter,
    ttl: Duration,
    lookup_timeout: Duration,
}

impl std::fmt::Debug for KeyCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("KeyCache")
            .field("source", &self.source.describe())
            .field("ttl", &self.ttl)
            .field("lookup_timeout", &self.lookup_timeout)
            .finish()
    }
}

enum Cached {
    Fresh(DecodingKey),
    // Answer from a fetch that finished after `since`.
    Settled(Option<DecodingKey>),
    Stale(Option<DecodingKey>),
}

impl KeyCache {
    pub fn new(source: Arc<dyn KeySource>, config: &JwksConfig) -> Self {
        Self {
            source,
            state: RwLock::new(KeyState::default()),
            refill: Mutex::new(()),
            limiter: LookupRateLimiter::per_minute(config.requests_per_minute),
            ttl: config.cache_ttl,
            lookup_timeout: config.lookup_timeout,
        }
    }

    /// Resolve the verification key for `kid`, fetching the key set if needed.
    pub async fn signing_key(&self, kid: &str) -> Result<DecodingKey, KeyLookupError> {
        let requested_at = Instant::now();

        if let Cached::Fresh(key) = self.lookup(kid, None).await {
            debug!(kid, "signing key served from cache");
            return Ok(key);
        }

        let _refill = self.refill.lock().await;

        let stale = match self.lookup(kid, Some(requested_at)).await {
            Cached::Fresh(key) => return Ok(key),
            Cached::Settled(found) => {
                debug!(kid, "signing key resolved by concurrent fetch");
                return found.ok_or_else(|| KeyLookupError::NotFound(kid.to_string()));
            }
            Cached::Stale(stale) => stale,
        };

        if !self.limiter.try_acquire().await {
            warn!(kid, source = %self.source.describe(), "jwks fetch rate limited");
            return stale.ok_or(KeyLookupError::RateLimited);
        }

        let fetch = self.source.fetch_key_set();
        let jwks = match tokio::time::timeout(self.lookup_timeout, fetch).await {
            Ok(Ok(jwks)) => jwks,
            Ok(Err(err)) => {
                warn!(kid, error = %err, "jwks fetch failed");
                return Err(KeyLookupError::Source(err.to_string()));
            }
            Err(_) => {
                warn!(
                    kid,
                    timeout_ms = self.lookup_timeout.as_millis() as u64,
                    "jwks fetch timed out"
                );
                return Err(KeyLookupError::Timeout(self.lookup_timeout));
            }
        };

        let fresh = Self::index(&jwks);
        let found = fresh.get(kid).map(|cached| cached.key.clone());

        {
            let mut state = self.state.write().await;
            state.keys = fresh;
            state.refreshed_at = Some(Instant::now());
        }

        found.ok_or_else(|| KeyLookupError::NotFound(kid.to_string()))
    }

    async fn lookup(&self, kid: &str, since: Option<Instant>) -> Cached {
        let state = self.state.read().await;
        let entry = state.keys.get(kid);

        if let Some(cached) = entry.filter(|c| c.is_fresh(self.ttl)) {
            return Cached::Fresh(cached.key.clone());
        }

        let key = entry.map(|cached| cached.key.clone());
        match (since, state.refreshed_at) {
            (Some(since), Some(refreshed_at)) if refreshed_at > since => Cached::Settled(key),
            _ => Cached::Stale(key),
        }
    }

    /// Drop every cached key.
    pub async fn invalidate(&self) {
        *self.state.write().await = KeyState::default();
    }

    /// Number of keys currently cached.
    pub async fn len(&self) -> usize {
        self.state.read().await.keys.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn index(jwks: &JwkSet) -> HashMap<String, CachedKey> {
        let fetched_at = Instant::now();
        let mut out = HashMap::with_capacity(jwks.keys.len());

        for jwk in &jwks.keys {
            let Some(kid) = jwk.common.key_id.as_deref().filter(|k| !k.is_empty()) else {
                warn!("skipping jwk without kid");
                continue;
            };

            if matches!(jwk.common.public_key_use, Some(PublicKeyUse::Encryption)) {
                debug!(kid, "skipping encryption jwk");
                continue;
            }

            match DecodingKey::from_jwk(jwk) {
                Ok(key) => {
                    out.insert(kid.to_string(), CachedKey { key, fetched_at });
                }
                Err(e) => warn!(kid, error = %e, "skipping unusable jwk"),
            }
        }

        out
    }
}
