use super::common::*;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use crate::assessment::router::{error_status, results_handler};
use crate::assessment::{AssessmentError, ImportError, ScoreRejection};

#[tokio::test]
async fn create_then_fetch_project() {
    let workspace = shared_workspace();

    let response = router_with(workspace.clone())
        .oneshot(json_request(
            "POST",
            "/api/v1/projects",
            &json!({ "name": "Foam", "description": "fermentation residues" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["name"], "Foam");
    assert_eq!(payload["active"], true);
    assert_eq!(payload["lifecycle_stages"].as_array().map(Vec::len), Some(7));

    let response = router_with(workspace)
        .oneshot(empty_request("GET", "/api/v1/projects"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["projects"], json!(["Foam"]));
    assert_eq!(payload["active"], "Foam");
}

#[tokio::test]
async fn duplicate_project_returns_conflict() {
    let workspace = shared_workspace();
    workspace
        .lock()
        .expect("workspace lock")
        .create("Foam", "")
        .expect("created");

    let response = router_with(workspace)
        .oneshot(json_request("POST", "/api/v1/projects", &json!({ "name": "Foam" })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let payload = read_json_body(response).await;
    assert!(payload["error"].as_str().is_some_and(|error| error.contains("Foam")));
}

#[tokio::test]
async fn scoring_flow_updates_results() {
    let workspace = shared_workspace();
    workspace
        .lock()
        .expect("workspace lock")
        .create("Foam", "")
        .expect("created");
    let router = router_with(workspace.clone());

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/v1/projects/Foam/factors/economic",
            &json!({ "factors": ["Capex", "Market size"] }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/v1/projects/Foam/scores",
            &json!({ "stage": "Use phase", "factor": "Capex", "score": 2.0, "note": "cheap" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["grid"]["Use phase"]["Capex"], json!({ "score": 2, "note": "cheap" }));

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/v1/projects/Foam/scores",
            &json!({ "stage": "Use phase", "factor": "Capex", "note": "revised" }),
        ))
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload["grid"]["Use phase"]["Capex"]["score"], 2);

    let response = router
        .oneshot(empty_request("GET", "/api/v1/projects/Foam/results"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["overall"], 2.0);
    assert_eq!(payload["overall_label"], "Worse");
    assert_eq!(payload["worst_stage"]["stage"], "Use phase");
}

#[tokio::test]
async fn invalid_scores_are_unprocessable() {
    let workspace = shared_workspace();
    {
        let mut guard = workspace.lock().expect("workspace lock");
        let project = guard.create("Foam", "").expect("created");
        project.select_default_factors();
    }
    let factor = workspace
        .lock()
        .expect("workspace lock")
        .get("Foam")
        .map(|project| project.all_selected_factors()[0].clone())
        .expect("factor selected");

    let response = router_with(workspace.clone())
        .oneshot(json_request(
            "PUT",
            "/api/v1/projects/Foam/scores",
            &json!({ "stage": "Use phase", "factor": factor, "score": 3.5 }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = router_with(workspace)
        .oneshot(json_request(
            "PUT",
            "/api/v1/projects/Foam/scores",
            &json!({ "stage": "Use phase", "factor": "Noise", "score": 3 }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stage_routes_enforce_capacity_and_rename() {
    let workspace = shared_workspace();
    workspace
        .lock()
        .expect("workspace lock")
        .create("Foam", "")
        .expect("created");
    let router = router_with(workspace.clone());

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/projects/Foam/stages",
            &json!({ "name": "Refurbishment" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/v1/projects/Foam/stages/Use%20phase",
            &json!({ "name": "Use" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/projects/Foam/stages/Use/move",
            &json!({ "direction": "up" }),
        ))
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload["moved"], true);
    assert_eq!(payload["lifecycle_stages"][4], "Use");

    let response = router
        .oneshot(json_request(
            "PUT",
            "/api/v1/projects/Foam/stages/Use/changed",
            &json!({ "expected_to_change": true }),
        ))
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload["lifecycle_changed"]["Use"], true);
}

#[tokio::test]
async fn import_and_export_round_trip_over_http() {
    let workspace = shared_workspace();
    let router = router_with(workspace.clone());
    let document = json!({
        "project": "Legacy foam",
        "lifecycle_stages": ["Synthesis"],
        "selected_factors": { "Economic": ["Capex"] },
        "grid": { "Synthesis": { "Capex": { "score": 4 } } },
    });

    let response = router
        .clone()
        .oneshot(json_request("POST", "/api/v1/imports", &document))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["scale"], "unconfirmed");

    let response = router
        .clone()
        .oneshot(json_request("POST", "/api/v1/imports", &document))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = router
        .clone()
        .oneshot(json_request("PUT", "/api/v1/imports", &document))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = router
        .oneshot(empty_request("GET", "/api/v1/projects/Legacy%20foam/export"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get(axum::http::header::CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    assert_eq!(
        disposition.as_deref(),
        Some("attachment; filename=\"Legacy_foam.json\"")
    );
    let payload = read_json_body(response).await;
    assert_eq!(payload["averages"]["overall"], 4.0);
    assert_eq!(workspace.lock().expect("workspace lock").len(), 1);
}

#[tokio::test]
async fn malformed_import_is_unprocessable() {
    let response = router_with(shared_workspace())
        .oneshot(
            axum::http::Request::post("/api/v1/imports")
                .body(axum::body::Body::from("{ not json"))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn results_handler_reports_missing_project() {
    let response = results_handler(State(shared_workspace()), Path("Missing".to_string())).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_removes_project() {
    let workspace = shared_workspace();
    workspace
        .lock()
        .expect("workspace lock")
        .create("Foam", "")
        .expect("created");

    let response = router_with(workspace.clone())
        .oneshot(empty_request("DELETE", "/api/v1/projects/Foam"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = router_with(workspace)
        .oneshot(empty_request("GET", "/api/v1/projects/Foam"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn catalog_routes_serve_reference_data() {
    let router = router_with(shared_workspace());

    let response = router
        .clone()
        .oneshot(empty_request("GET", "/api/v1/catalog/trl"))
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload.as_array().map(Vec::len), Some(9));

    let response = router
        .clone()
        .oneshot(empty_request("GET", "/api/v1/catalog/factors/environmental"))
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert!(payload[0]["environmental"]["version"].is_string());

    let response = router
        .oneshot(empty_request("GET", "/api/v1/catalog/factors/cultural"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stage_and_project_names_do_not_shadow_actions() {
    let workspace = shared_workspace();
    {
        let mut guard = workspace.lock().expect("workspace lock");
        guard.create("import", "").expect("created");
        let project = guard.create("Foam", "").expect("created");
        project.remove_stage("Use phase");
        project.add_stage("reset", None).expect("stage added");
    }
    let router = router_with(workspace.clone());

    let response = router
        .clone()
        .oneshot(empty_request("GET", "/api/v1/projects/import"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .clone()
        .oneshot(empty_request("DELETE", "/api/v1/projects/Foam/stages/reset"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["lifecycle_stages"].as_array().map(Vec::len), Some(6));

    let response = router
        .oneshot(empty_request("POST", "/api/v1/projects/Foam/reset-stages"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["lifecycle_stages"][5], "Use phase");
    assert_eq!(payload["lifecycle_stages"].as_array().map(Vec::len), Some(7));
}

#[test]
fn error_statuses_follow_the_failure_kind() {
    assert_eq!(
        error_status(&AssessmentError::CapacityExceeded { limit: 7 }),
        StatusCode::CONFLICT
    );
    assert_eq!(
        error_status(&AssessmentError::InvalidScore(ScoreRejection::OutOfRange(9))),
        StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(
        error_status(&AssessmentError::Import(ImportError::MissingName)),
        StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(
        error_status(&AssessmentError::StageNotFound("Use".to_string())),
        StatusCode::NOT_FOUND
    );
}
