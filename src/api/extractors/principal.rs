use std::collections::BTreeMap;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::state::AppState;

/// Identity the authorizer attributed to the caller.
///
/// Inserted into request extensions by `middleware::gateway_auth`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: String,
    pub context: BTreeMap<String, String>,
}

/// Handler-side extractor for `Principal`.
/// Missing principal means the route was mounted without the gateway middleware: 401.
pub struct PrincipalExtractor(pub Principal);

impl FromRequestParts<AppState> for PrincipalExtractor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(PrincipalExtractor)
            .ok_or(AppError::Unauthorized)
    }
}
