/*
 * Responsibility
 * - HTTP 層の公開インターフェース (routes() / tenant_routes() の re-export)
 */
pub mod dto;
pub mod extractors;
pub mod handlers;
mod routes;

pub use routes::{routes, tenant_routes};
