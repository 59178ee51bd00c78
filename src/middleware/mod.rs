/*
 * Responsibility
 * - middleware の公開インターフェース
 * - cors (preflight + echo headers), gateway_auth (token authorizer gate), http (request id / trace / limits)
 */
pub mod cors;
pub mod gateway_auth;
pub mod http;
