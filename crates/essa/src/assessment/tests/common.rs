use std::sync::{Arc, Mutex};

use axum::response::Response;
use axum::Router;
use serde_json::Value;

use crate::assessment::{project_router, Dimension, Project, StagePolicy, Workspace};

pub(super) const ENVIRONMENTAL: [&str; 3] = ["Climate change", "Water use", "Land use"];
pub(super) const SOCIAL: [&str; 3] = ["Health & safety", "Fair wages", "Local employment"];
pub(super) const ECONOMIC: [&str; 3] = ["Production cost", "Market size", "Capex"];

/// Project with only the given stages and three factors per dimension.
pub(super) fn project_with_stages(stages: &[&str]) -> Project {
    let mut project = Project::new("Bio-based foam", "Foam from fermentation residues");
    for stage in project.lifecycle_stages().to_vec() {
        project.remove_stage(&stage);
    }
    for stage in stages {
        project.add_stage(stage, None).expect("stage added");
    }
    project.set_factor_selection(Dimension::Environmental, ENVIRONMENTAL);
    project.set_factor_selection(Dimension::Social, SOCIAL);
    project.set_factor_selection(Dimension::Economic, ECONOMIC);
    project
}

pub(super) fn score(project: &mut Project, stage: &str, factor: &str, value: i64) {
    project
        .set_score(stage, factor, Some(value))
        .expect("score accepted");
}

pub(super) fn shared_workspace() -> Arc<Mutex<Workspace>> {
    Arc::new(Mutex::new(Workspace::new(StagePolicy::default())))
}

pub(super) fn router_with(workspace: Arc<Mutex<Workspace>>) -> Router {
    project_router(workspace)
}

pub(super) fn json_request(
    method: &str,
    uri: &str,
    body: &Value,
) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(body).expect("serialize body"),
        ))
        .expect("request builds")
}

pub(super) fn empty_request(method: &str, uri: &str) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
