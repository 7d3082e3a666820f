mod clock;
mod config;
mod db;
mod errors;
mod extract;
mod journey;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::clock::SystemClock;
use crate::config::Config;
use crate::db::create_pool;
use crate::journey::store::PgProfileStore;
use crate::journey::Catalog;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SkillQuest API v{}", env!("CARGO_PKG_VERSION"));

    // Validate the embedded curriculum before accepting traffic
    let catalog = Catalog::builtin()?;
    info!(
        "Journey catalog loaded: {} days, {} XP total",
        catalog.len(),
        catalog.total_xp()
    );

    let rules = config.journey_rules();
    info!("Level threshold: {} XP", rules.level_xp_threshold);

    // Initialize PostgreSQL-backed profile store
    let db = create_pool(&config.database_url).await?;
    let store = Arc::new(PgProfileStore::new(db));

    let state = AppState {
        progress: store.clone(),
        entitlements: store,
        catalog: Arc::new(catalog),
        rules,
        clock: Arc::new(SystemClock),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the web client's domain

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
