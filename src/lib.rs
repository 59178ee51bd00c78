//! Token-authorized tenant API.
//!
//! - `services::authorizer`: JWT bearer validation against the issuer's JWKS
//! - `services::jwks`: key source + kid cache
//! - `services::tenant`: resource handler
//! - `api` / `middleware`: gateway contract over axum
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
