use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

use crate::disease_model::DiseaseModel;
use crate::error::ModelError;
use crate::knowledge;
use crate::report::{self, REPORT_FILE_NAME, REPORT_MIME_TYPE};

const INDEX_HTML: &str = include_str!("../static/index.html");

/// Upload cap. Phone camera photos routinely exceed axum's 2 MB default
/// body limit, so raise it; anything past this is rejected per-request.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Shared per-process state: the model loaded once at startup.
pub struct AppState {
    pub model: DiseaseModel,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/predict", post(predict))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Everything the page needs to render one result and offer the download.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub label: String,
    pub confidence: f32,
    pub cause: String,
    pub prevention: String,
    pub report: String,
    pub report_file_name: &'static str,
    pub report_mime_type: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

enum ApiError {
    MissingFile,
    Upload(MultipartError),
    Model(ModelError),
    Internal(String),
}

impl From<ModelError> for ApiError {
    fn from(err: ModelError) -> Self {
        ApiError::Model(err)
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Upload(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::MissingFile => (
                StatusCode::BAD_REQUEST,
                "no image file in upload".to_string(),
            ),
            ApiError::Upload(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::Model(err) => {
                let status = if err.is_recoverable() {
                    StatusCode::UNPROCESSABLE_ENTITY
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                (status, err.to_string())
            }
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        if status.is_server_error() {
            error!("request failed: {message}");
        }
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Accepts one multipart image upload and runs the full pipeline:
/// normalize, classify, knowledge lookup, report formatting.
async fn predict(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<PredictResponse>, ApiError> {
    let mut image_bytes = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            image_bytes = Some(field.bytes().await?);
            break;
        }
    }
    let image_bytes = image_bytes.ok_or(ApiError::MissingFile)?;

    // Inference is CPU-bound; keep it off the async worker threads.
    let state_for_task = state.clone();
    let prediction = tokio::task::spawn_blocking(move || {
        state_for_task.model.predict(&image_bytes)
    })
    .await
    .map_err(|err| ApiError::Internal(format!("inference task failed: {err}")))??;

    info!(
        label = %prediction.label,
        confidence = prediction.confidence,
        "classified upload"
    );

    let record = knowledge::lookup(&prediction.label);
    let report_text = report::build_report(
        &prediction.label,
        prediction.confidence,
        record.cause,
        record.prevention,
    );

    Ok(Json(PredictResponse {
        label: prediction.label,
        confidence: prediction.confidence,
        cause: record.cause.to_string(),
        prevention: record.prevention.to_string(),
        report: report_text,
        report_file_name: REPORT_FILE_NAME,
        report_mime_type: REPORT_MIME_TYPE,
    }))
}
