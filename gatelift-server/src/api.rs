//! HTTP API
//!
//! One page, one analysis endpoint, one health check. The upload is a
//! multipart form so the browser can post the CSV directly; optional form
//! fields override the configured defaults for that request only.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::analysis::{self, AnalysisConfig};
use crate::config::GateliftConfig;
use crate::page;

/// Uploads larger than this are rejected before parsing
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Build the dashboard router
pub fn create_router(config: GateliftConfig) -> Router {
    let api = Router::new()
        .route("/analyze", post(analyze))
        .route("/health", get(health));

    Router::new()
        .route("/", get(index))
        .nest("/api/v1", api)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(config)
}

/// Error body returned to the dashboard, which phrases the inline message
/// from `kind`
fn error_response(status: StatusCode, kind: &str, message: String) -> (StatusCode, Json<serde_json::Value>) {
    (
        status,
        Json(serde_json::json!({
            "error": { "kind": kind, "message": message }
        })),
    )
}

async fn index() -> Html<&'static str> {
    Html(page::DASHBOARD_HTML)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Parsed multipart form: the CSV plus any per-request overrides
struct AnalyzeForm {
    csv: Vec<u8>,
    config: AnalysisConfig,
}

async fn analyze(
    State(config): State<GateliftConfig>,
    multipart: Multipart,
) -> Result<Json<gatelift_report::AnalysisReport>, (StatusCode, Json<serde_json::Value>)> {
    let form = read_form(multipart, config.analysis_defaults()).await?;

    tracing::info!(
        bytes = form.csv.len(),
        cutoff = form.config.rounds_cutoff,
        iterations = form.config.bootstrap_iterations,
        "analyzing upload"
    );

    // The bootstrap loops are CPU-bound, so run them off the async runtime.
    let result =
        tokio::task::spawn_blocking(move || analysis::run_analysis(&form.csv, &form.config))
            .await
            .map_err(|e| {
                tracing::error!("analysis task failed: {e}");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    "analysis task failed".to_string(),
                )
            })?;

    result.map(Json).map_err(|e| {
        let kind = e.kind();
        tracing::warn!(kind = kind.as_str(), "analysis failed: {e}");
        error_response(StatusCode::UNPROCESSABLE_ENTITY, kind.as_str(), e.to_string())
    })
}

async fn read_form(
    mut multipart: Multipart,
    mut config: AnalysisConfig,
) -> Result<AnalyzeForm, (StatusCode, Json<serde_json::Value>)> {
    let upload_error = |message: String| {
        error_response(StatusCode::BAD_REQUEST, "upload", message)
    };

    let mut csv: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| upload_error(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| upload_error(format!("failed to read upload: {e}")))?;
                csv = Some(bytes.to_vec());
            }
            "cutoff" => {
                config.rounds_cutoff = parse_field(field, &name).await.map_err(upload_error)?;
            }
            "iterations" => {
                config.bootstrap_iterations =
                    parse_field(field, &name).await.map_err(upload_error)?;
            }
            "seed" => {
                config.seed = Some(parse_field(field, &name).await.map_err(upload_error)?);
            }
            // Unknown fields are ignored so the form can grow without
            // breaking older servers.
            _ => {}
        }
    }

    let csv = csv.ok_or_else(|| upload_error("missing 'file' field".to_string()))?;
    Ok(AnalyzeForm { csv, config })
}

async fn parse_field<T: std::str::FromStr>(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<T, String> {
    let text = field
        .text()
        .await
        .map_err(|e| format!("failed to read '{name}': {e}"))?;
    text.trim()
        .parse()
        .map_err(|_| format!("invalid value for '{name}': {text:?}"))
}
