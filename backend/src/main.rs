//! Sembrando Bits Sensor Dashboard - Backend Server
//!
//! Serves device readings and crop compatibility reports for small farms
//! monitored with low-cost soil and air sensors.

use std::net::SocketAddr;
use std::sync::Arc;

use sembrando_bits_backend::{
    create_app, external::SensorApiClient, services::Poller, AppState, Config,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "sb_server=debug,sembrando_bits_backend=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Sembrando Bits Dashboard Server");
    tracing::info!("Environment: {}", config.environment);

    // A malformed crop range is a startup error, never a silent skip
    let catalog = config.crop_catalog()?;
    tracing::info!("Loaded {} crop profiles", catalog.len());

    tracing::info!("Sensor service at {}", config.upstream.base_url);
    let client = SensorApiClient::new(
        config.upstream.base_url.clone(),
        config.upstream.request_timeout(),
    )?;

    // Create application state
    let state = AppState::new(config.clone(), catalog, client);

    // Refresh every configured device in the background
    let _coarse_poller = Poller::spawn(
        "all-devices",
        config.polling.coarse_interval(),
        config.polling.device_ids(),
        Arc::clone(&state.client),
        state.cache.clone(),
    );

    // Build application
    let app = create_app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
