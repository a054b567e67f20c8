mod advice;
mod auth;
mod config;
mod db;
mod errors;
mod models;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::advice::dispatcher::AdviceDispatcher;
use crate::auth::session::SessionStore;
use crate::auth::store::{CredentialStore, InMemoryCredentialStore, PgCredentialStore};
use crate::config::Config;
use crate::db::{apply_schema, create_pool};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Compass API v{}", env!("CARGO_PKG_VERSION"));

    // Load model artifacts; any failure here aborts before the listener binds
    let dispatcher = AdviceDispatcher::load(&config.model_dir, config.classifier_backend)
        .with_context(|| format!("loading model artifacts from {}", config.model_dir.display()))?;
    info!("Advice dispatcher ready (classifier: {})", dispatcher.backend());

    // Initialize credential store (in-memory unless DATABASE_URL is set)
    let credentials: Arc<dyn CredentialStore> = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            apply_schema(&pool).await?;
            Arc::new(PgCredentialStore::new(pool))
        }
        None => Arc::new(InMemoryCredentialStore::new()),
    };
    info!("Credential store: {}", credentials.backend());

    // Build app state
    let state = AppState {
        credentials,
        sessions: SessionStore::new(config.session_ttl()),
        dispatcher: Arc::new(dispatcher),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the front-end host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
