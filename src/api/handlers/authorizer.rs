/*
 * Responsibility
 * - POST /invocations/authorizer (token authorizer の契約)
 * - 常に policy を返す: Allow か明示的な Deny (エラーにはしない)
 */
use axum::{Json, extract::State};
use tracing::debug;

use crate::api::dto::TokenAuthorizerEvent;
use crate::services::authorizer::AuthorizerResponse;
use crate::state::AppState;

pub async fn invoke_authorizer(
    State(state): State<AppState>,
    Json(event): Json<TokenAuthorizerEvent>,
) -> Json<AuthorizerResponse> {
    // Never log the token itself.
    debug!(
        kind = event.kind.as_deref().unwrap_or(""),
        method_arn = event.method_arn.as_deref().unwrap_or(""),
        "authorizer invoked"
    );

    let decision = state.authorizer.authorize(&event.authorization_token).await;
    let resource = event.resource_or(&state.gateway.policy_resource);

    Json(decision.into_response(resource))
}
