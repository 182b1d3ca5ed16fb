//! Early-stage sustainability assessment: project scoping, the stage by factor
//! score grid, derived averages, and the portable JSON document.

pub mod aggregate;
pub mod catalog;
pub mod cell;
pub mod document;
pub mod domain;
pub mod grid;
pub mod interpretation;
pub mod project;
pub mod router;
pub mod summary;
pub mod workspace;

#[cfg(test)]
mod tests;

pub use aggregate::{
    BreakdownEntry, DimensionAverage, FactorAverage, ScoringProgress, StageAverage,
};
pub use catalog::{EnvironmentalIndicator, FactorSpec, TrlLevel};
pub use cell::{Score, ScoreCell};
pub use document::{
    export_document, export_file_name, import_document, write_grid_csv, AveragesSnapshot,
    DocumentKind, ImportError, ProjectDocument, CURRENT_SCHEMA_VERSION,
};
pub use domain::{
    AssessmentError, Dimension, MoveDirection, NameKind, ScaleOrientation, ScoreRejection,
    StagePolicy, StageRef, DEFAULT_MAX_STAGES, FACTORS_PER_DIMENSION,
};
pub use grid::ScoreGrid;
pub use interpretation::{BandTable, BandTableError, InterpretationBand};
pub use project::{Project, DEFAULT_TRL};
pub use router::{project_router, SharedWorkspace};
pub use summary::{AssessmentSummary, FactorResultEntry, HighlightedStage, StageResultEntry};
pub use workspace::{ImportConflict, Workspace};
