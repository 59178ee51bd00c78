//! Gateway front door for tenant routes.
//!
//! Per request:
//! 1. read the identity source header (`x-tenant-auth` by default)
//! 2. pre-screen it against the token validation regex (no authorizer call on mismatch)
//! 3. run the authorizer; Deny => 401, Allow => `Principal` into request extensions
//!
//! Handlers only see requests that were allowed.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};
use tracing::warn;

use crate::api::extractors::Principal;
use crate::error::AppError;
use crate::services::authorizer::{Decision, token};
use crate::state::AppState;

/// Put the gateway authorizer in front of `router`.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, gateway_auth))
}

async fn gateway_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let header = &state.gateway.identity_header;

    let token = match req.headers().get(header).and_then(|v| v.to_str().ok()) {
        Some(raw) => token::strip_bearer(raw).to_string(),
        None => {
            warn!(header = %header, "identity source missing");
            return Err(AppError::Unauthorized);
        }
    };

    if !state.gateway.token_pattern.is_match(&token) {
        warn!(header = %header, "identity source failed validation pattern");
        return Err(AppError::Unauthorized);
    }

    match state.authorizer.authorize(&token).await {
        Decision::Allow {
            principal_id,
            context,
        } => {
            req.extensions_mut().insert(Principal {
                id: principal_id,
                context,
            });
            Ok(next.run(req).await)
        }
        // Reason already logged by the authorizer.
        Decision::Deny { .. } => Err(AppError::Unauthorized),
    }
}
