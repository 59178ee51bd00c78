//! JWKS key resolution.
//!
//! - `source`: where key sets come from (HTTP in production, fakes in tests)
//! - `cache`: kid-keyed signing key cache with TTL + lookup rate limit
pub mod cache;
pub mod rate_limit;
pub mod source;

use std::time::Duration;

pub use cache::{KeyCache, KeyLookupError};
pub use source::{HttpJwksSource, KeySource, KeySourceError, jwks_uri};

/// Knobs for JWKS lookups.
#[derive(Debug, Clone, Copy)]
pub struct JwksConfig {
    // Upper bound for one key lookup (fetch incl. retry).
    pub lookup_timeout: Duration,
    // Max JWKS fetches in any 60s window.
    pub requests_per_minute: u32,
    // How long a fetched key is served without refetching.
    pub cache_ttl: Duration,
    // Delay before the single retry of a transient fetch failure.
    pub retry_backoff: Duration,
}

impl Default for JwksConfig {
    fn default() -> Self {
        Self {
            lookup_timeout: Duration::from_secs(5),
            requests_per_minute: 5,
            cache_ttl: Duration::from_secs(600),
            retry_backoff: Duration::from_millis(200),
        }
    }
}
