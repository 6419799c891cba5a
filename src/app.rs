/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config 読み込み → 依存生成 (PgPool, SessionVerifier) → Router 組み立て
 * - Middleware の適用 (HTTP / CORS、認証 pipeline は routes 側)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::repos::account::PgAccountStore;
use crate::services::identity::build_session_verifier;
use crate::state::AppState;
use crate::{api, middleware};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,account_gate=debug,tower_http=debug cargo run
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
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting account gate in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let verifier = build_session_verifier(config).context("building session verifier")?;

    // Shared read-only by every request; retries/timeouts are the pool's concern.
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.database_url)
        .await
        .context("connecting to account database")?;

    tracing::info!(fields = %config.resolver_fields, "account resolver secret fields");

    Ok(AppState::new(
        verifier,
        Arc::new(PgAccountStore::new(pool)),
        config.resolver_fields.clone(),
        config.lookup_timeout,
    ))
}

fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router, config.request_timeout)
}
