/*
 * Responsibility
 * - GET /tenant-handler (gateway_auth の後ろ): 検証済み principal で tenant handler を実行
 * - POST /invocations/tenant-handler: 任意の event を受けて proxy JSON で返す
 */
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::warn;

use crate::api::extractors::PrincipalExtractor;
use crate::services::tenant::{self, ProxyResponse};
use crate::state::AppState;

pub async fn get_tenant(
    State(state): State<AppState>,
    PrincipalExtractor(principal): PrincipalExtractor,
    method: Method,
    uri: Uri,
) -> ProxyResponse {
    let event = json!({
        "httpMethod": method.as_str(),
        "path": uri.path(),
        "requestContext": {
            "authorizer": {
                "principalId": principal.id,
            }
        }
    });

    tenant::handle(&event, &state.cors)
}

pub async fn invoke_tenant_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Json<ProxyResponse> {
    // Any input is accepted; non-JSON bodies are passed on as a string.
    let event = serde_json::from_slice::<serde_json::Value>(&body).unwrap_or_else(|_| {
        serde_json::Value::String(String::from_utf8_lossy(&body).into_owned())
    });

    Json(tenant::handle(&event, &state.cors))
}

impl IntoResponse for ProxyResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, self.body).into_response();

        let headers = response.headers_mut();
        for (name, value) in &self.headers {
            match (HeaderName::try_from(name.as_str()), HeaderValue::from_str(value)) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!(header = %name, "dropping invalid proxy response header"),
            }
        }

        response
    }
}
