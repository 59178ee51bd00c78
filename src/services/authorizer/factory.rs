/// Factory: build the process-wide `Authorizer` from application `Config`.
use std::sync::Arc;

use thiserror::Error;

use crate::config::Config;
use crate::services::authorizer::{Authorizer, EnvironmentError};
use crate::services::jwks::{HttpJwksSource, KeyCache, KeySourceError};

#[derive(Debug, Error)]
pub enum AuthorizerSetupError {
    #[error(transparent)]
    Environment(#[from] EnvironmentError),
    #[error(transparent)]
    KeySource(#[from] KeySourceError),
}

pub fn build_authorizer(config: &Config) -> Result<Arc<Authorizer>, AuthorizerSetupError> {
    // Validate before building the HTTP client so misconfiguration never reaches the network.
    config.auth.validate()?;

    let source = HttpJwksSource::new(config.jwks_uri.clone(), &config.jwks)?;
    let keys = KeyCache::new(Arc::new(source), &config.jwks);
    let authorizer = Authorizer::new(config.auth.clone(), keys)?;

    Ok(Arc::new(authorizer))
}
