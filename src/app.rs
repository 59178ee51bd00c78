/*
 * Responsibility
 * - Config読み込み → 依存生成 (Authorizer + JWKS cache) → Router 組み立て
 * - Middleware の適用 (gateway auth / CORS / http)
 * - axum::serve() で起動
 */
use std::{panic, process};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::Config,
    middleware,
    services::authorizer::build_authorizer,
    state::AppState,
};

fn init_tracing() {
    // RUST_LOG=info,tenant_gateway=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash the whole process so we notice immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "refusing to start: invalid environment");
            return Err(err.into());
        }
    };

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        env = ?config.app_env,
        addr = %config.addr,
        audience = %config.auth.audience,
        issuer = %config.auth.issuer,
        jwks_uri = %config.jwks_uri,
        "starting tenant gateway"
    );

    let state = build_state(&config)?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_state(config: &Config) -> Result<AppState> {
    let authorizer = build_authorizer(config)?;
    Ok(AppState::new(authorizer, config))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let invocations = middleware::http::apply(api::routes(), config.request_timeout);

    // CORS outermost: 401 from gateway_auth and 408/413 from the http stack get the echo headers.
    let tenant = middleware::gateway_auth::apply(api::tenant_routes(), state.clone());
    let tenant = middleware::http::apply(tenant, config.request_timeout);
    let tenant = middleware::cors::apply(tenant, &state.cors);

    Router::new()
        .merge(invocations)
        .merge(tenant)
        .with_state(state)
}
