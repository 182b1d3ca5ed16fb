use super::aggregate::{BreakdownEntry, DimensionAverage, ScoringProgress, StageAverage};
use super::domain::{Dimension, ScaleOrientation};
use super::interpretation::BandTable;
use super::project::Project;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct StageResultEntry {
    pub stage: String,
    pub expected_to_change: bool,
    pub average: Option<f64>,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FactorResultEntry {
    pub factor: String,
    pub dimension: Option<Dimension>,
    pub average: f64,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HighlightedStage {
    pub stage: String,
    pub average: f64,
    pub label: String,
}

/// Results view handed to the CLI and HTTP layers.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentSummary {
    pub project: String,
    pub scale: ScaleOrientation,
    pub overall: Option<f64>,
    pub overall_label: String,
    pub stages: Vec<StageResultEntry>,
    pub factors: Vec<FactorResultEntry>,
    pub dimensions: Vec<DimensionAverage>,
    pub best_stage: Option<HighlightedStage>,
    pub worst_stage: Option<HighlightedStage>,
    pub worst_stage_breakdown: Vec<BreakdownEntry>,
    pub progress: ScoringProgress,
}

impl Project {
    pub fn summary(&self) -> AssessmentSummary {
        let table = BandTable::for_orientation(self.scale());
        let label = |value: Option<f64>| -> String {
            match (value, table.as_ref()) {
                (Some(value), Some(table)) => table.label(value).to_string(),
                _ => "n/a".to_string(),
            }
        };

        let stages = self
            .average_by_stage()
            .into_iter()
            .map(|entry| StageResultEntry {
                expected_to_change: self.is_stage_changed(&entry.stage),
                label: label(entry.average),
                average: entry.average,
                stage: entry.stage,
            })
            .collect();

        let factors = self
            .average_by_factor()
            .into_iter()
            .map(|entry| FactorResultEntry {
                label: label(Some(entry.average)),
                factor: entry.factor,
                dimension: entry.dimension,
                average: entry.average,
            })
            .collect();

        let highlight = |stage: Option<StageAverage>| {
            stage.and_then(|entry| {
                let average = entry.average?;
                Some(HighlightedStage {
                    label: label(Some(average)),
                    stage: entry.stage,
                    average,
                })
            })
        };

        let worst_stage = highlight(self.worst_stage());
        let worst_stage_breakdown = worst_stage
            .as_ref()
            .map(|entry| self.stage_breakdown(&entry.stage))
            .unwrap_or_default();
        let overall = self.overall_score();

        AssessmentSummary {
            project: self.name().to_string(),
            scale: self.scale(),
            overall,
            overall_label: label(overall),
            stages,
            factors,
            dimensions: self.average_by_dimension(),
            best_stage: highlight(self.best_stage()),
            worst_stage,
            worst_stage_breakdown,
            progress: self.progress(),
        }
    }
}
