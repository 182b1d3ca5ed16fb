use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;

use super::catalog::{self, DEFAULT_LIFE_CYCLE, TRL_TABLE};
use super::cell::Score;
use super::document::{export_document, export_file_name, DocumentKind, ProjectDocument};
use super::domain::{AssessmentError, Dimension, MoveDirection, ScaleOrientation, ScoreRejection};
use super::interpretation::BandTable;
use super::project::Project;
use super::workspace::{ImportConflict, Workspace};

pub type SharedWorkspace = Arc<Mutex<Workspace>>;

/// Router exposing project editing, results, and the reference catalogs.
pub fn project_router(workspace: SharedWorkspace) -> Router {
    Router::new()
        .route(
            "/api/v1/projects",
            get(list_projects_handler).post(create_project_handler),
        )
        .route(
            "/api/v1/imports",
            post(import_handler).put(import_replace_handler),
        )
        .route(
            "/api/v1/projects/:name",
            get(project_handler).delete(delete_project_handler),
        )
        .route("/api/v1/projects/:name/export", get(export_handler))
        .route("/api/v1/projects/:name/results", get(results_handler))
        .route("/api/v1/projects/:name/scoping", put(scoping_handler))
        .route("/api/v1/projects/:name/stages", post(add_stage_handler))
        .route(
            "/api/v1/projects/:name/reset-stages",
            post(reset_stages_handler),
        )
        .route(
            "/api/v1/projects/:name/stages/:stage",
            put(rename_stage_handler).delete(remove_stage_handler),
        )
        .route(
            "/api/v1/projects/:name/stages/:stage/move",
            post(move_stage_handler),
        )
        .route(
            "/api/v1/projects/:name/stages/:stage/changed",
            put(stage_changed_handler),
        )
        .route(
            "/api/v1/projects/:name/factors/defaults",
            post(default_factors_handler),
        )
        .route(
            "/api/v1/projects/:name/factors/:dimension",
            put(factor_selection_handler),
        )
        .route("/api/v1/projects/:name/scores", put(score_handler))
        .route("/api/v1/catalog/trl", get(trl_catalog_handler))
        .route("/api/v1/catalog/life-cycle", get(life_cycle_catalog_handler))
        .route("/api/v1/catalog/bands", get(bands_catalog_handler))
        .route(
            "/api/v1/catalog/factors/:dimension",
            get(factor_catalog_handler),
        )
        .with_state(workspace)
}

/// Project document plus the gating flags the editor needs.
#[derive(Debug, Serialize)]
pub struct ProjectView {
    #[serde(flatten)]
    pub document: ProjectDocument,
    pub active: bool,
    pub scoping_complete: bool,
    pub factor_selection_complete: bool,
    pub ready_for_scoring: bool,
    pub ready_for_results: bool,
}

impl ProjectView {
    fn of(project: &Project, active: bool) -> Self {
        Self {
            document: export_document(project),
            active,
            scoping_complete: project.scoping_complete(),
            factor_selection_complete: project.factor_selection_complete(),
            ready_for_scoring: project.ready_for_scoring(),
            ready_for_results: project.ready_for_results(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateProject {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScopingUpdate {
    pub description: Option<String>,
    pub core_function: Option<String>,
    pub functional_unit: Option<String>,
    pub scoping_notes: Option<String>,
    pub trl: Option<i64>,
    pub scale: Option<ScaleOrientation>,
}

#[derive(Debug, Deserialize)]
pub struct AddStage {
    pub name: String,
    pub section: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RenameStage {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct MoveStage {
    pub direction: MoveDirection,
}

#[derive(Debug, Deserialize)]
pub struct StageChanged {
    pub expected_to_change: bool,
}

#[derive(Debug, Deserialize)]
pub struct FactorSelection {
    pub factors: Vec<String>,
}

/// `score: null` clears the cell; leaving `score` out keeps it.
#[derive(Debug, Deserialize)]
pub struct ScoreUpdate {
    pub stage: String,
    pub factor: String,
    #[serde(default, deserialize_with = "present")]
    pub score: Option<Option<f64>>,
    pub note: Option<String>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

pub(crate) async fn list_projects_handler(State(workspace): State<SharedWorkspace>) -> Response {
    let workspace = match lock(&workspace) {
        Ok(guard) => guard,
        Err(response) => return response,
    };
    let payload = json!({
        "projects": workspace.names(),
        "active": workspace.active_name(),
        "max_stages": workspace.policy().max_stages,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn create_project_handler(
    State(workspace): State<SharedWorkspace>,
    axum::Json(request): axum::Json<CreateProject>,
) -> Response {
    let mut workspace = match lock(&workspace) {
        Ok(guard) => guard,
        Err(response) => return response,
    };
    match workspace.create(&request.name, &request.description) {
        Ok(project) => (
            StatusCode::CREATED,
            axum::Json(ProjectView::of(project, true)),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn import_handler(
    State(workspace): State<SharedWorkspace>,
    body: String,
) -> Response {
    import_with(&workspace, &body, ImportConflict::Reject)
}

pub(crate) async fn import_replace_handler(
    State(workspace): State<SharedWorkspace>,
    body: String,
) -> Response {
    import_with(&workspace, &body, ImportConflict::Replace)
}

fn import_with(workspace: &SharedWorkspace, body: &str, conflict: ImportConflict) -> Response {
    let mut workspace = match lock(workspace) {
        Ok(guard) => guard,
        Err(response) => return response,
    };
    match workspace.import(body, conflict) {
        Ok(project) => (
            StatusCode::CREATED,
            axum::Json(ProjectView::of(project, true)),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn project_handler(
    State(workspace): State<SharedWorkspace>,
    Path(name): Path<String>,
) -> Response {
    let workspace = match lock(&workspace) {
        Ok(guard) => guard,
        Err(response) => return response,
    };
    match workspace.get(&name) {
        Some(project) => {
            let active = workspace.active_name() == Some(name.as_str());
            (StatusCode::OK, axum::Json(ProjectView::of(project, active))).into_response()
        }
        None => error_response(AssessmentError::ProjectNotFound(name)),
    }
}

pub(crate) async fn delete_project_handler(
    State(workspace): State<SharedWorkspace>,
    Path(name): Path<String>,
) -> Response {
    let mut workspace = match lock(&workspace) {
        Ok(guard) => guard,
        Err(response) => return response,
    };
    match workspace.delete(&name) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => error_response(AssessmentError::ProjectNotFound(name)),
    }
}

pub(crate) async fn export_handler(
    State(workspace): State<SharedWorkspace>,
    Path(name): Path<String>,
) -> Response {
    let workspace = match lock(&workspace) {
        Ok(guard) => guard,
        Err(response) => return response,
    };
    let Some(project) = workspace.get(&name) else {
        return error_response(AssessmentError::ProjectNotFound(name));
    };
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_file_name(project, DocumentKind::Project)
    );
    (
        StatusCode::OK,
        [(header::CONTENT_DISPOSITION, disposition)],
        axum::Json(export_document(project)),
    )
        .into_response()
}

pub(crate) async fn results_handler(
    State(workspace): State<SharedWorkspace>,
    Path(name): Path<String>,
) -> Response {
    let workspace = match lock(&workspace) {
        Ok(guard) => guard,
        Err(response) => return response,
    };
    match workspace.get(&name) {
        Some(project) => (StatusCode::OK, axum::Json(project.summary())).into_response(),
        None => error_response(AssessmentError::ProjectNotFound(name)),
    }
}

pub(crate) async fn scoping_handler(
    State(workspace): State<SharedWorkspace>,
    Path(name): Path<String>,
    axum::Json(update): axum::Json<ScopingUpdate>,
) -> Response {
    with_project(&workspace, name, |project| {
        if let Some(trl) = update.trl {
            project.set_trl(trl)?;
        }
        if let Some(description) = update.description {
            project.description = description;
        }
        if let Some(core_function) = update.core_function {
            project.core_function = core_function;
        }
        if let Some(functional_unit) = update.functional_unit {
            project.functional_unit = functional_unit;
        }
        if let Some(notes) = update.scoping_notes {
            project.scoping_notes = notes;
        }
        if let Some(scale) = update.scale {
            project.set_scale(scale);
        }
        Ok(StatusCode::OK)
    })
}

pub(crate) async fn add_stage_handler(
    State(workspace): State<SharedWorkspace>,
    Path(name): Path<String>,
    axum::Json(request): axum::Json<AddStage>,
) -> Response {
    let mut workspace = match lock(&workspace) {
        Ok(guard) => guard,
        Err(response) => return response,
    };
    let Some(project) = workspace.get_mut(&name) else {
        return error_response(AssessmentError::ProjectNotFound(name));
    };
    let before = project.lifecycle_stages().len();
    match project.add_stage(&request.name, request.section.as_deref()) {
        Ok(stage) => {
            let status = if project.lifecycle_stages().len() > before {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            (status, axum::Json(stage)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn reset_stages_handler(
    State(workspace): State<SharedWorkspace>,
    Path(name): Path<String>,
) -> Response {
    with_project(&workspace, name, |project| {
        project.reset_stages_to_default();
        Ok(StatusCode::OK)
    })
}

pub(crate) async fn rename_stage_handler(
    State(workspace): State<SharedWorkspace>,
    Path((name, stage)): Path<(String, String)>,
    axum::Json(request): axum::Json<RenameStage>,
) -> Response {
    with_project(&workspace, name, |project| {
        project.rename_stage(&stage, &request.name)?;
        Ok(StatusCode::OK)
    })
}

pub(crate) async fn remove_stage_handler(
    State(workspace): State<SharedWorkspace>,
    Path((name, stage)): Path<(String, String)>,
) -> Response {
    with_project(&workspace, name, |project| {
        project.remove_stage(&stage);
        Ok(StatusCode::OK)
    })
}

pub(crate) async fn move_stage_handler(
    State(workspace): State<SharedWorkspace>,
    Path((name, stage)): Path<(String, String)>,
    axum::Json(request): axum::Json<MoveStage>,
) -> Response {
    let mut workspace = match lock(&workspace) {
        Ok(guard) => guard,
        Err(response) => return response,
    };
    let Some(project) = workspace.get_mut(&name) else {
        return error_response(AssessmentError::ProjectNotFound(name));
    };
    let moved = project.move_stage(&stage, request.direction);
    let payload = json!({
        "moved": moved,
        "lifecycle_stages": project.lifecycle_stages(),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn stage_changed_handler(
    State(workspace): State<SharedWorkspace>,
    Path((name, stage)): Path<(String, String)>,
    axum::Json(request): axum::Json<StageChanged>,
) -> Response {
    with_project(&workspace, name, |project| {
        project.set_stage_changed(&stage, request.expected_to_change)?;
        Ok(StatusCode::OK)
    })
}

pub(crate) async fn default_factors_handler(
    State(workspace): State<SharedWorkspace>,
    Path(name): Path<String>,
) -> Response {
    with_project(&workspace, name, |project| {
        project.select_default_factors();
        Ok(StatusCode::OK)
    })
}

pub(crate) async fn factor_selection_handler(
    State(workspace): State<SharedWorkspace>,
    Path((name, dimension)): Path<(String, String)>,
    axum::Json(request): axum::Json<FactorSelection>,
) -> Response {
    let Some(dimension) = Dimension::parse(&dimension) else {
        return unknown_dimension(&dimension);
    };
    with_project(&workspace, name, |project| {
        project.set_factor_selection(dimension, &request.factors);
        Ok(StatusCode::OK)
    })
}

pub(crate) async fn score_handler(
    State(workspace): State<SharedWorkspace>,
    Path(name): Path<String>,
    axum::Json(update): axum::Json<ScoreUpdate>,
) -> Response {
    with_project(&workspace, name, |project| {
        if let Some(score) = update.score {
            let value = score
                .map(Score::from_f64)
                .transpose()?
                .map(|score| i64::from(score.value()));
            project.set_score(&update.stage, &update.factor, value)?;
        }
        if let Some(note) = update.note {
            project.set_note(&update.stage, &update.factor, note)?;
        }
        Ok(StatusCode::OK)
    })
}

pub(crate) async fn trl_catalog_handler() -> Response {
    (StatusCode::OK, axum::Json(&TRL_TABLE[..])).into_response()
}

pub(crate) async fn life_cycle_catalog_handler() -> Response {
    (StatusCode::OK, axum::Json(&DEFAULT_LIFE_CYCLE[..])).into_response()
}

pub(crate) async fn bands_catalog_handler() -> Response {
    let payload = json!({
        "higher_is_better": BandTable::higher_is_better(),
        "lower_is_better": BandTable::lower_is_better(),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn factor_catalog_handler(Path(dimension): Path<String>) -> Response {
    match Dimension::parse(&dimension) {
        Some(dimension) => {
            (StatusCode::OK, axum::Json(catalog::factors(dimension))).into_response()
        }
        None => unknown_dimension(&dimension),
    }
}

/// Runs `edit` against the named project and answers with its refreshed view.
fn with_project<F>(workspace: &SharedWorkspace, name: String, edit: F) -> Response
where
    F: FnOnce(&mut Project) -> Result<StatusCode, AssessmentError>,
{
    let mut workspace = match lock(workspace) {
        Ok(guard) => guard,
        Err(response) => return response,
    };
    let active = workspace.active_name() == Some(name.as_str());
    let Some(project) = workspace.get_mut(&name) else {
        return error_response(AssessmentError::ProjectNotFound(name));
    };
    match edit(project) {
        Ok(status) => (status, axum::Json(ProjectView::of(project, active))).into_response(),
        Err(error) => error_response(error),
    }
}

fn lock(workspace: &SharedWorkspace) -> Result<MutexGuard<'_, Workspace>, Response> {
    workspace.lock().map_err(|_| {
        let payload = json!({ "error": "workspace unavailable" });
        (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
    })
}

fn unknown_dimension(raw: &str) -> Response {
    let payload = json!({
        "error": format!("unknown dimension '{raw}'"),
    });
    (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
}

pub(crate) fn error_status(error: &AssessmentError) -> StatusCode {
    match error {
        AssessmentError::ProjectNotFound(_) | AssessmentError::StageNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        AssessmentError::DuplicateName { .. } | AssessmentError::CapacityExceeded { .. } => {
            StatusCode::CONFLICT
        }
        AssessmentError::InvalidScore(
            ScoreRejection::UnknownStage(_) | ScoreRejection::UnknownFactor(_),
        ) => StatusCode::NOT_FOUND,
        AssessmentError::EmptyName
        | AssessmentError::InvalidScore(_)
        | AssessmentError::InvalidTrl(_)
        | AssessmentError::Import(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn error_response(error: AssessmentError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (error_status(&error), axum::Json(payload)).into_response()
}
