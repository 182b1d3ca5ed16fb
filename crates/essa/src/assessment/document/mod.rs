//! Portable JSON document used to export, persist, and import projects.

mod table;
mod upgrade;

pub use table::write_grid_csv;

use super::cell::ScoreCell;
use super::domain::{Dimension, ScaleOrientation};
use super::grid::ScoreGrid;
use super::project::{Project, ProjectParts, DEFAULT_TRL};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

/// Version written by [`export_document`].
pub const CURRENT_SCHEMA_VERSION: u64 = 2;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("document is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("document must be a JSON object")]
    NotAnObject,
    #[error("document is missing the project name")]
    MissingName,
    #[error("document does not match the project schema: {0}")]
    Schema(#[source] serde_json::Error),
    #[error("field '{field}' is invalid: {reason}")]
    InvalidField { field: String, reason: String },
    #[error("schema version {0} is newer than this release supports")]
    UnsupportedVersion(u64),
}

impl ImportError {
    fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Point-in-time aggregates written alongside the grid. Not re-derived on import.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AveragesSnapshot {
    #[serde(default)]
    pub by_stage: BTreeMap<String, Option<f64>>,
    #[serde(default)]
    pub by_factor: BTreeMap<String, f64>,
    #[serde(default)]
    pub overall: Option<f64>,
}

impl AveragesSnapshot {
    pub fn of(project: &Project) -> Self {
        Self {
            by_stage: project
                .average_by_stage()
                .into_iter()
                .map(|entry| (entry.stage, entry.average))
                .collect(),
            by_factor: project
                .average_by_factor()
                .into_iter()
                .map(|entry| (entry.factor, entry.average))
                .collect(),
            overall: project.overall_score(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    pub schema_version: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_trl", deserialize_with = "whole_number")]
    pub trl: i64,
    #[serde(default)]
    pub scoping_notes: String,
    #[serde(default)]
    pub core_function: String,
    #[serde(default)]
    pub functional_unit: String,
    #[serde(default)]
    pub lifecycle_stages: Vec<String>,
    #[serde(default)]
    pub lifecycle_changed: BTreeMap<String, bool>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub stage_sections: BTreeMap<String, String>,
    #[serde(default)]
    pub selected_factors: BTreeMap<Dimension, Vec<String>>,
    #[serde(default)]
    pub grid: BTreeMap<String, BTreeMap<String, ScoreCell>>,
    #[serde(default)]
    pub scale: ScaleOrientation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub averages: Option<AveragesSnapshot>,
}

fn default_trl() -> i64 {
    i64::from(DEFAULT_TRL)
}

/// Accepts integral-valued numbers such as `4.0`, like [`Score`](super::Score) does.
fn whole_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(serde::de::Error::custom(format!("{value} is not a whole number")));
    }
    Ok(value as i64)
}

/// Re-keys `map` by trimmed names. An already trimmed key wins over a padded one.
fn trim_keys<V>(map: BTreeMap<String, V>) -> BTreeMap<String, V> {
    let mut trimmed = BTreeMap::new();
    for (key, value) in map {
        let name = key.trim();
        if name == key {
            trimmed.insert(key, value);
        } else {
            trimmed.entry(name.to_string()).or_insert(value);
        }
    }
    trimmed
}

/// Which download a document is meant for; only affects the suggested file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Project,
    Results,
}

/// Snapshot of `project`, including the aggregates as of now.
pub fn export_document(project: &Project) -> ProjectDocument {
    ProjectDocument {
        schema_version: CURRENT_SCHEMA_VERSION,
        name: project.name().to_string(),
        description: project.description.clone(),
        trl: i64::from(project.trl()),
        scoping_notes: project.scoping_notes.clone(),
        core_function: project.core_function.clone(),
        functional_unit: project.functional_unit.clone(),
        lifecycle_stages: project.lifecycle_stages().to_vec(),
        lifecycle_changed: project.lifecycle_changed().clone(),
        stage_sections: project.stage_sections().clone(),
        selected_factors: project.selected_factors().clone(),
        grid: project
            .grid()
            .rows()
            .map(|(stage, row)| (stage.clone(), row.clone()))
            .collect(),
        scale: project.scale(),
        exported_at: Some(Utc::now()),
        averages: Some(AveragesSnapshot::of(project)),
    }
}

/// Parses and upgrades a document, then rebuilds the project it describes.
pub fn import_document(raw: &str) -> Result<Project, ImportError> {
    ProjectDocument::parse(raw).map(ProjectDocument::into_project)
}

/// `My Project` -> `My_Project.json` / `My_Project_results.json`.
pub fn export_file_name(project: &Project, kind: DocumentKind) -> String {
    let stem = project.name().trim().replace(' ', "_");
    match kind {
        DocumentKind::Project => format!("{stem}.json"),
        DocumentKind::Results => format!("{stem}_results.json"),
    }
}

impl ProjectDocument {
    pub fn parse(raw: &str) -> Result<Self, ImportError> {
        let value: Value = serde_json::from_str(raw).map_err(ImportError::Malformed)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, ImportError> {
        let Value::Object(map) = value else {
            return Err(ImportError::NotAnObject);
        };
        let (map, source_version) = upgrade::to_current(map)?;

        match map.get("name") {
            Some(Value::String(name)) if !name.trim().is_empty() => {}
            _ => return Err(ImportError::MissingName),
        }

        let document: Self =
            serde_json::from_value(Value::Object(map)).map_err(ImportError::Schema)?;
        document.validate()?;
        info!(
            project = %document.name,
            source_version,
            stages = document.lifecycle_stages.len(),
            "project document parsed"
        );
        Ok(document)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn into_project(self) -> Project {
        let selected_factors = self
            .selected_factors
            .into_iter()
            .map(|(dimension, names)| {
                let mut unique: Vec<String> = Vec::new();
                for name in names {
                    let name = name.trim().to_string();
                    if !name.is_empty() && !unique.contains(&name) {
                        unique.push(name);
                    }
                }
                (dimension, unique)
            })
            .collect();

        let grid = trim_keys(self.grid)
            .into_iter()
            .map(|(stage, row)| (stage, trim_keys(row)))
            .collect();

        Project::from_parts(ProjectParts {
            name: self.name.trim().to_string(),
            description: self.description,
            trl: u8::try_from(self.trl).unwrap_or(DEFAULT_TRL),
            core_function: self.core_function,
            functional_unit: self.functional_unit,
            scoping_notes: self.scoping_notes,
            lifecycle_stages: self
                .lifecycle_stages
                .iter()
                .map(|stage| stage.trim().to_string())
                .collect(),
            lifecycle_changed: trim_keys(self.lifecycle_changed),
            stage_sections: trim_keys(self.stage_sections),
            selected_factors,
            grid: ScoreGrid::from_rows(grid),
            scale: self.scale,
        })
    }

    fn validate(&self) -> Result<(), ImportError> {
        if !(1..=9).contains(&self.trl) {
            return Err(ImportError::invalid_field(
                "trl",
                format!("{} is outside the 1-9 range", self.trl),
            ));
        }

        let mut seen = BTreeSet::new();
        for stage in &self.lifecycle_stages {
            let stage = stage.trim();
            if stage.is_empty() {
                return Err(ImportError::invalid_field(
                    "lifecycle_stages",
                    "stage names must not be empty",
                ));
            }
            if !seen.insert(stage) {
                return Err(ImportError::invalid_field(
                    "lifecycle_stages",
                    format!("stage '{stage}' appears more than once"),
                ));
            }
        }

        Ok(())
    }
}
