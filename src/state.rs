/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - authorizer (key cache inside), gateway settings, CORS echo headers
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::config::{Config, GatewayConfig};
use crate::middleware::cors::CorsHeaders;
use crate::services::authorizer::Authorizer;

#[derive(Clone, Debug)]
pub struct AppState {
    pub authorizer: Arc<Authorizer>,
    pub gateway: Arc<GatewayConfig>,
    pub cors: CorsHeaders,
}

impl AppState {
    pub fn new(authorizer: Arc<Authorizer>, config: &Config) -> Self {
        Self {
            authorizer,
            gateway: Arc::new(config.gateway.clone()),
            cors: CorsHeaders::new(config.allowed_origin.as_deref()),
        }
    }
}
