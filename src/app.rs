/*
 * Responsibility
 * - tracing / panic hook 初期化
 * - Config読み込み → 依存生成 (TokenResolver, EventBus, GIS probe) → Router 組み立て
 * - Middleware の適用 (HTTP/CORS/Security headers)
 * - axum::serve() で起動
 */
use std::{panic, process};

use anyhow::{Context, Result};
use axum::{Json, Router, routing::get};
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::services::auth::build_token_resolver;
use crate::services::events::{EventBus, TracingListener};
use crate::services::gis::GisSupport;
use crate::state::AppState;
use crate::{api, middleware};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,odm_gateway=debug,tower_http=debug cargo run
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
        // Always surface panic via tracing; stderr can be hidden depending on how the
        // process is launched.
        tracing::error!(?info, "panic");

        // Development: crash the whole process. Production: default behavior.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("loading configuration")?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting gateway in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub async fn build_state(config: &Config) -> Result<AppState> {
    // Lazy pool: the database is only touched when a token is resolved.
    let db = match &config.database_url {
        Some(url) => Some(
            PgPoolOptions::new()
                .max_connections(5)
                .connect_lazy(url)
                .context("invalid DATABASE_URL")?,
        ),
        None => None,
    };

    let auth = build_token_resolver(&config.auth, db).context("building token resolver")?;

    let events = EventBus::default();
    events.register(TracingListener);

    let gis = GisSupport::probe(&config.gis_probe).await;

    Ok(AppState::new(auth, events, gis))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    async fn health() -> Json<serde_json::Value> {
        Json(json!({"status": "ok"}))
    }

    let router = Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    let router = middleware::security_headers::apply(router);
    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router)
}
