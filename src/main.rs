// src/main.rs

use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod board;
mod config;
mod db;
mod error;
mod models;
mod password;
mod policy;
mod report;
mod routes;
mod search;
mod session;
mod store;

use config::Config;
use session::SessionRegistry;
use store::{AccountStore, ComplaintStore};

#[derive(Clone)]
pub struct AppState {
    pub complaints: Arc<dyn ComplaintStore>,
    pub accounts: Arc<dyn AccountStore>,
    pub sessions: SessionRegistry,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("electrifix_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    let pool = db::connect(&config).await?;

    let state = AppState {
        complaints: Arc::new(db::PgComplaintStore::new(pool.clone())),
        accounts: Arc::new(db::PgAccountStore::new(pool)),
        sessions: SessionRegistry::new(config.session_ttl()),
    };

    // Very permissive CORS for local dev (tighten for prod)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = routes::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "complaint desk API listening");

    axum::serve(listener, api.into_make_service()).await?;
    Ok(())
}
