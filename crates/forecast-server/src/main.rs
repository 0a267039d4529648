//! Forecast Server - HTTP front end for the conflict forecaster

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use forecast_server::api;
use forecast_server::config::Config;
use forecast_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    // Initialize tracing
    let (plain, json) = if config.log_json {
        (None, Some(tracing_subscriber::fmt::layer().json()))
    } else {
        (Some(tracing_subscriber::fmt::layer()), None)
    };
    tracing_subscriber::registry()
        .with(plain)
        .with(json)
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("forecast_server=debug".parse()?))
        .init();

    tracing::info!("Starting Forecast Server...");
    tracing::info!(
        "Sampling every {}ms, region tie-break {}, {} circle vertices",
        config.scan.effective_period_ms(),
        config.scan.tie_break,
        config.features.circle_vertices
    );

    let state = Arc::new(AppState::new(&config));
    let app = api::routes(&config).with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
