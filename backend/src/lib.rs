//! Sembrando Bits sensor dashboard service
//!
//! Polls field devices through the sensor service, keeps their last known
//! readings and scores them against crop reference ranges.

use std::sync::Arc;

use axum::{routing::get, Router};
use shared::CropCatalog;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};

use external::SensorApiClient;
use services::{DashboardSession, DeviceCache};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Arc<CropCatalog>,
    pub cache: DeviceCache,
    pub client: Arc<SensorApiClient>,
    pub session: Arc<Mutex<DashboardSession<SensorApiClient>>>,
}

impl AppState {
    pub fn new(config: Config, catalog: CropCatalog, client: SensorApiClient) -> Self {
        let catalog = Arc::new(catalog);
        let client = Arc::new(client);
        let cache = DeviceCache::new();
        let session = DashboardSession::new(
            Arc::clone(&client),
            cache.clone(),
            Arc::clone(&catalog),
            config.polling.device_ids(),
            config.polling.fine_interval(),
        );

        Self {
            config: Arc::new(config),
            catalog,
            cache,
            client,
            session: Arc::new(Mutex::new(session)),
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
