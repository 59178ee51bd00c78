/*
 * Responsibility
 * - サービスの URL 構造を定義
 * - invocation endpoints (authorizer / tenant handler) + health: gateway auth なし
 * - tenant resource routes は別で返す (app.rs で gateway_auth + CORS を載せるため)
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::handlers::{
    authorizer::invoke_authorizer,
    health::health,
    tenant::{get_tenant, invoke_tenant_handler},
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/invocations/authorizer", post(invoke_authorizer))
        .route("/invocations/tenant-handler", post(invoke_tenant_handler))
}

pub fn tenant_routes() -> Router<AppState> {
    Router::new().route("/tenant-handler", get(get_tenant))
}
