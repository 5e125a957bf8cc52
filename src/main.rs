//! GitHub webhook activity feed server
//!
//! Receives push / pull-request webhook deliveries, stores the normalized
//! records in Postgres and serves a polling UI on top of them.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gitfeed_rs::config::AppConfig;
use gitfeed_rs::store::PgEventStore;
use gitfeed_rs::{web, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; deployed environments set the variables directly
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gitfeed_rs=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    // Connect before binding so a bad DATABASE_URL fails startup
    let store = PgEventStore::connect(&config.database_url).await?;
    let state = AppState::new(Arc::new(store));

    let app = web::create_router(state);

    let addr: SocketAddr = config.bind_address().parse()?;
    tracing::info!("📡 Gitfeed server running on http://{}", addr);
    tracing::info!("   Webhook endpoint: http://{}/webhook", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
