use plant_disease_detector::disease_model::DiseaseModel;
use plant_disease_detector::server::{self, AppState};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const LISTEN_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let model_dir = std::env::var("MODEL_DIR").unwrap_or_else(|_| "model".to_string());
    let model = DiseaseModel::new(Path::new(&model_dir)).map_err(|err| {
        tracing::error!("failed to load model from {model_dir}: {err}");
        err
    })?;

    let state = Arc::new(AppState { model });
    let app = server::router(state);

    tracing::info!("plant disease detector listening on {LISTEN_ADDR}");
    let listener = tokio::net::TcpListener::bind(LISTEN_ADDR).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
