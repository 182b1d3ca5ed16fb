use serde::{Deserialize, Serialize};
use std::fmt;

/// Default ceiling on the number of life cycle stages a project may hold.
pub const DEFAULT_MAX_STAGES: usize = 7;

/// Number of factors that must be selected in every dimension before scoring.
pub const FACTORS_PER_DIMENSION: usize = 3;

/// Sustainability dimension a factor belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Environmental,
    Social,
    Economic,
}

impl Dimension {
    pub const fn ordered() -> [Self; 3] {
        [Self::Environmental, Self::Social, Self::Economic]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Environmental => "Environmental",
            Self::Social => "Social",
            Self::Economic => "Economic",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "environmental" | "environment" | "env" => Some(Self::Environmental),
            "social" | "soc" => Some(Self::Social),
            "economic" | "economy" | "eco" => Some(Self::Economic),
            _ => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Orientation of the 1-5 scale.
///
/// Earlier releases stored scores where 1 meant "much better"; current projects
/// use 5 for "much better". Documents that predate the orientation field are
/// imported as `Unconfirmed` and keep their numbers as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleOrientation {
    #[default]
    HigherIsBetter,
    LowerIsBetter,
    Unconfirmed,
}

impl ScaleOrientation {
    pub const fn label(self) -> &'static str {
        match self {
            Self::HigherIsBetter => "1 = Much Worse, 5 = Much Better",
            Self::LowerIsBetter => "1 = Much Better, 5 = Much Worse",
            Self::Unconfirmed => "orientation not confirmed",
        }
    }
}

/// Direction for reordering a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    Up,
    Down,
}

/// Capacity rules applied when stages are added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StagePolicy {
    pub max_stages: usize,
}

impl StagePolicy {
    /// Builds a policy that allows at least the default number of stages.
    pub fn with_max_stages(max_stages: usize) -> Self {
        Self {
            max_stages: max_stages.max(DEFAULT_MAX_STAGES),
        }
    }
}

impl Default for StagePolicy {
    fn default() -> Self {
        Self {
            max_stages: DEFAULT_MAX_STAGES,
        }
    }
}

/// Handle to a stage returned by [`Project::add_stage`](super::Project::add_stage).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageRef {
    pub index: usize,
    pub name: String,
}

/// Kind of entity whose name collided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Stage,
    Project,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameKind::Stage => f.write_str("stage"),
            NameKind::Project => f.write_str("project"),
        }
    }
}

/// Reason a score update was refused.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoreRejection {
    #[error("score {0} is outside the 1-5 scale")]
    OutOfRange(i64),
    #[error("score {0} is not a whole number")]
    NotIntegral(f64),
    #[error("stage '{0}' is not part of the project")]
    UnknownStage(String),
    #[error("factor '{0}' is not among the selected factors")]
    UnknownFactor(String),
}

/// Errors raised by project, workspace, and document operations.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("a {kind} named '{name}' already exists")]
    DuplicateName { kind: NameKind, name: String },
    #[error("stage limit of {limit} reached")]
    CapacityExceeded { limit: usize },
    #[error("invalid score: {0}")]
    InvalidScore(#[from] ScoreRejection),
    #[error("stage '{0}' not found")]
    StageNotFound(String),
    #[error("project '{0}' not found")]
    ProjectNotFound(String),
    #[error("TRL {0} is outside the 1-9 range")]
    InvalidTrl(i64),
    #[error(transparent)]
    Import(#[from] super::document::ImportError),
}

impl AssessmentError {
    pub(crate) fn duplicate_stage(name: impl Into<String>) -> Self {
        Self::DuplicateName {
            kind: NameKind::Stage,
            name: name.into(),
        }
    }

    pub(crate) fn duplicate_project(name: impl Into<String>) -> Self {
        Self::DuplicateName {
            kind: NameKind::Project,
            name: name.into(),
        }
    }
}
