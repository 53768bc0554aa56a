use std::sync::Arc;

use anyhow::Context as _;
use defect_recognizer::{
    Recognizer,
    yolo::{self, YoloDetector},
};
use facility_api::{config, database::FacilityStore, state::AppState};
use poem::{Server, listener::TcpListener};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::parse_config()?;

    let store = FacilityStore::connect(&config.database_url)
        .await
        .context("Failed to connect to the database")?;
    store
        .init()
        .await
        .context("Failed to initialize the facilities table")?;

    yolo::init_runtime()?;
    let detector = YoloDetector::load(&config.model_path)?;
    let recognizer =
        Recognizer::new(Arc::new(detector)).with_confidence_threshold(config.confidence_threshold);

    let state = AppState {
        store,
        recognizer,
        penalties: Arc::new(config.penalties),
        detection_timeout: config.detection_timeout,
    };

    tracing::info!(
        "Listening on {addr}; the GraphQL playground is at http://127.0.0.1:{port}/graphql",
        addr = config.bind_addr,
        port = config.bind_addr.port()
    );

    Server::new(TcpListener::bind(config.bind_addr))
        .run(facility_api::app(state))
        .await
        .context("Server stopped unexpectedly")?;

    Ok(())
}
