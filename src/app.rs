/*
 * Responsibility
 * - logging / panic hook
 * - Config -> storage backend + services -> AppState
 * - Router assembly (/health, /api/v1) and middleware order
 * - axum::serve()
 */
use std::{panic, process, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::api::v1::handlers::health::health;
use crate::config::Config;
use crate::middleware::{cors, http, security_headers};
use crate::repos::{Repos, memory::MemoryStore};
use crate::services::auth::{TokenService, password::hash_password};
use crate::services::media::MediaUrls;
use crate::state::AppState;

fn init_tracing() {
    // RUST_LOG wins when set, e.g. RUST_LOG=info,yatube_api=debug,tower_http=debug
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

        // development: crash loudly; production: default hook, server keeps running
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
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let repos = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .acquire_timeout(Duration::from_secs(5))
                .connect(url)
                .await
                .context("failed to connect to DATABASE_URL")?;
            tracing::info!(
                max_connections = config.database_max_connections,
                "using PostgreSQL storage"
            );
            Repos::postgres(pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory storage (data is lost on exit)");
            let store = MemoryStore::new();
            for (username, password) in &config.bootstrap_users {
                let hash = hash_password(password)?;
                let user = store.insert_user(username, &hash).await;
                tracing::info!(
                    user_id = user.id,
                    username = %user.username,
                    "bootstrap user created"
                );
            }
            Repos::memory(Arc::new(store))
        }
    };

    let auth = Arc::new(TokenService::new(
        &config.auth_secret,
        &config.auth_issuer,
        config.access_token_ttl_seconds,
        config.access_token_leeway_seconds,
    ));

    let media = MediaUrls::new(&config.media_base_url).context("invalid MEDIA_BASE_URL")?;

    Ok(AppState::new(repos, auth, media))
}

/// Routes and state only, no outer middleware. Integration tests drive this directly.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state)
}

fn build_router(state: AppState, config: &Config) -> Router {
    let router = api_router(state);

    // Order: inner -> outer (CORS outermost so preflights never reach the rest)
    let router = security_headers::apply(router);
    let router = http::apply(router, http::HttpLimits::default());
    cors::apply(router, config.app_env, &config.cors_allowed_origins)
}
