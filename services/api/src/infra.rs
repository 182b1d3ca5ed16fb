use essa::assessment::{Dimension, ScaleOrientation, SharedWorkspace, StagePolicy, Workspace};
use essa::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn shared_workspace(policy: StagePolicy) -> SharedWorkspace {
    Arc::new(Mutex::new(Workspace::new(policy)))
}

pub(crate) fn read_document(path: &Path) -> Result<String, AppError> {
    std::fs::read_to_string(path).map_err(AppError::from)
}

pub(crate) fn parse_dimension(raw: &str) -> Result<Dimension, String> {
    Dimension::parse(raw)
        .ok_or_else(|| format!("'{raw}' is not one of environmental, social, economic"))
}

pub(crate) fn parse_scale(raw: &str) -> Result<ScaleOrientation, String> {
    match raw.trim().to_ascii_lowercase().replace('_', "-").as_str() {
        "higher-is-better" | "higher" => Ok(ScaleOrientation::HigherIsBetter),
        "lower-is-better" | "lower" => Ok(ScaleOrientation::LowerIsBetter),
        _ => Err(format!(
            "'{raw}' is not a scale orientation (higher-is-better or lower-is-better)"
        )),
    }
}
