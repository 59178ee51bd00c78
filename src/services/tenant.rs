//! Tenant resource handler.
//!
//! Runs only after the authorizer allowed the caller. Currently a stub that
//! answers `{}`; the response shape is the gateway proxy contract.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};

use crate::middleware::cors::CorsHeaders;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl ProxyResponse {
    fn json(status: StatusCode, cors: &CorsHeaders, body: String) -> Self {
        let mut headers = BTreeMap::from([(
            "Content-Type".to_string(),
            "application/json".to_string(),
        )]);
        for (name, value) in cors.pairs() {
            if let Ok(value) = value.to_str() {
                headers.insert(canonical(name.as_str()), value.to_string());
            }
        }

        Self {
            status_code: status.as_u16(),
            headers,
            body,
        }
    }

    /// 500 with the same CORS headers as a success.
    pub fn internal_error(cors: &CorsHeaders) -> Self {
        let body = json!({"error": {"code": "INTERNAL", "message": "internal server error"}});
        Self::json(StatusCode::INTERNAL_SERVER_ERROR, cors, body.to_string())
    }
}

// `access-control-allow-origin` -> `Access-Control-Allow-Origin`
fn canonical(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

#[derive(Debug, Serialize)]
struct TenantBody {}

/// Handle one authorized tenant request. Never fails: unexpected errors
/// become a 500 proxy response.
pub fn handle(event: &serde_json::Value, cors: &CorsHeaders) -> ProxyResponse {
    info!(
        path = event.get("path").and_then(|p| p.as_str()).unwrap_or(""),
        method = event.get("httpMethod").and_then(|m| m.as_str()).unwrap_or(""),
        "tenant handler invoked"
    );

    match serde_json::to_string(&TenantBody {}) {
        Ok(body) => ProxyResponse::json(StatusCode::OK, cors, body),
        Err(e) => {
            error!(error = %e, "failed to serialize tenant response");
            ProxyResponse::internal_error(cors)
        }
    }
}
