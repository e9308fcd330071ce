/*
 * Responsibility
 * - Config loading -> dependency wiring -> Router assembly
 * - Initial JWKS load + background refresh task
 * - axum::serve() with graceful shutdown
 */
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::Config,
    middleware,
    repos::{DrinkRepo, MemoryDrinkRepo, PgDrinkRepo},
    services::auth::{
        build_token_verifier,
        keys::{KeyProvider, spawn_periodic_refresh},
    },
    state::AppState,
};

fn init_tracing() {
    // RUST_LOG wins when set, e.g. RUST_LOG=info,coffee_shop=debug,tower_http=debug
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    tracing::info!(
        env = ?config.app_env,
        addr = %config.addr,
        jwks_url = %config.auth.jwks_url,
        "starting coffee shop API"
    );

    let drinks = build_drink_repo(&config).await?;
    let verifier = build_token_verifier(&config)?;

    // Startup keeps going without keys; the first kid miss retries the fetch.
    let keys = verifier.key_provider();
    match keys.refresh().await {
        Ok(count) => tracing::info!(count, "signing keys loaded"),
        Err(err) => tracing::warn!(error = %err, "initial JWKS fetch failed"),
    }
    let refresh_task = spawn_periodic_refresh(keys, config.auth.jwks_refresh_interval);

    let state = AppState::new(drinks, verifier);
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    refresh_task.abort();
    tracing::info!("server stopped");
    Ok(())
}

async fn build_drink_repo(config: &Config) -> Result<Arc<dyn DrinkRepo>> {
    match &config.database_url {
        Some(url) => {
            let repo = PgDrinkRepo::connect(url).await?;
            repo.ensure_schema().await?;
            tracing::info!("using PostgreSQL drink storage");
            Ok(Arc::new(repo))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; drinks are kept in memory");
            Ok(Arc::new(MemoryDrinkRepo::new()))
        }
    }
}

/// Full application router: routes, then HTTP layers, then CORS outermost.
pub fn build_router(state: AppState, config: &Config) -> Router {
    let app = api::routes(&state).with_state(state);
    let app = middleware::http::apply(app, config);
    middleware::cors::apply(app, config)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
