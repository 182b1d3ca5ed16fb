use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use essa::assessment::{
    project_router, write_grid_csv, AssessmentSummary, ProjectDocument, ScaleOrientation,
    SharedWorkspace,
};
use essa::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Stateless report over a document the caller already holds.
#[derive(Debug, Deserialize)]
pub(crate) struct ReportRequest {
    pub(crate) document: serde_json::Value,
    #[serde(default)]
    pub(crate) scale: Option<ScaleOrientation>,
    #[serde(default)]
    pub(crate) include_grid_csv: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReportResponse {
    pub(crate) summary: AssessmentSummary,
    pub(crate) ready_for_results: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) grid_csv: Option<String>,
}

pub(crate) fn with_assessment_routes(workspace: SharedWorkspace) -> axum::Router {
    project_router(workspace)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/report", axum::routing::post(report_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    if ready {
        (StatusCode::OK, Json(json!({ "status": "ready" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "initializing" })),
        )
    }
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn report_endpoint(
    Json(request): Json<ReportRequest>,
) -> Result<Json<ReportResponse>, AppError> {
    let ReportRequest {
        document,
        scale,
        include_grid_csv,
    } = request;

    let mut project = ProjectDocument::from_value(document)?.into_project();
    if let Some(scale) = scale {
        project.set_scale(scale);
    }

    let grid_csv = if include_grid_csv {
        let mut buffer = Vec::new();
        write_grid_csv(&project, &mut buffer)?;
        Some(String::from_utf8_lossy(&buffer).into_owned())
    } else {
        None
    };

    Ok(Json(ReportResponse {
        summary: project.summary(),
        ready_for_results: project.ready_for_results(),
        grid_csv,
    }))
}
