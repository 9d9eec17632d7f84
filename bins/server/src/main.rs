//! Forecourt API Server
//!
//! Main entry point for the Forecourt backend service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use forecourt_api::{AppState, create_router};
use forecourt_core::model::LinearNetSalesModel;
use forecourt_db::connect;
use forecourt_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forecourt=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Connect to database
    let db = connect(&config.database.url, config.database.max_connections).await?;
    info!("Connected to database");

    // Load the net-sales model once for the process lifetime
    let model = LinearNetSalesModel::from_path(&config.model.path)
        .with_context(|| format!("Failed to load net-sales model from {}", config.model.path))?;
    info!(path = %config.model.path, "Net-sales model loaded");

    // Create JWT service
    let jwt_service = JwtService::new(JwtConfig {
        secret: config.jwt.secret.clone(),
        access_token_expires_minutes: config.jwt.access_token_expires_minutes,
        refresh_token_expires_days: config.jwt.refresh_token_expires_days,
    });

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        model: Arc::new(model),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
