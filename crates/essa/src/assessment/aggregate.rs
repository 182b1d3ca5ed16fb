//! Averages derived from a project's grid. Nothing here is cached; every call
//! walks the grid again.

use super::cell::{Score, ScoreCell};
use super::domain::{Dimension, ScaleOrientation};
use super::project::Project;
use serde::Serialize;
use std::collections::BTreeMap;

/// Mean of a stage's known scores; `None` when the stage has none.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageAverage {
    pub stage: String,
    pub average: Option<f64>,
    pub known: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorAverage {
    pub factor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<Dimension>,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionAverage {
    pub dimension: Dimension,
    pub average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownEntry {
    pub factor: String,
    pub score: Option<Score>,
    pub note: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoringProgress {
    pub known: usize,
    pub total: usize,
}

impl ScoringProgress {
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.known == self.total
    }
}

fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    (count > 0).then(|| sum / count as f64)
}

impl Project {
    /// Stage averages in life cycle order.
    pub fn average_by_stage(&self) -> Vec<StageAverage> {
        self.lifecycle_stages()
            .iter()
            .map(|stage| {
                let known: Vec<f64> = self
                    .grid()
                    .row(stage)
                    .map(|row| row.values().filter_map(ScoreCell::value).collect())
                    .unwrap_or_default();
                StageAverage {
                    stage: stage.clone(),
                    average: mean(known.iter().copied()),
                    known: known.len(),
                }
            })
            .collect()
    }

    /// Factor averages across stages; factors without any known score are left out.
    pub fn average_by_factor(&self) -> Vec<FactorAverage> {
        let mut values: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for (_, row) in self.grid().rows() {
            for (factor, cell) in row {
                if let Some(value) = cell.value() {
                    values.entry(factor.as_str()).or_default().push(value);
                }
            }
        }

        let mut order = self.all_selected_factors();
        for (_, row) in self.grid().rows() {
            for factor in row.keys() {
                if !order.contains(factor) {
                    order.push(factor.clone());
                }
            }
        }

        order
            .into_iter()
            .filter_map(|factor| {
                let average = mean(values.get(factor.as_str())?.iter().copied())?;
                Some(FactorAverage {
                    dimension: self.dimension_of(&factor),
                    factor,
                    average,
                })
            })
            .collect()
    }

    /// Mean of the stage averages that have at least one known score.
    pub fn overall_score(&self) -> Option<f64> {
        mean(
            self.average_by_stage()
                .into_iter()
                .filter_map(|entry| entry.average),
        )
    }

    /// Stage with the highest valid average; the earliest stage wins ties.
    pub fn highest_stage(&self) -> Option<StageAverage> {
        self.pick_stage(|candidate, current| candidate > current)
    }

    /// Stage with the lowest valid average; the earliest stage wins ties.
    pub fn lowest_stage(&self) -> Option<StageAverage> {
        self.pick_stage(|candidate, current| candidate < current)
    }

    pub fn best_stage(&self) -> Option<StageAverage> {
        match self.scale() {
            ScaleOrientation::HigherIsBetter => self.highest_stage(),
            ScaleOrientation::LowerIsBetter => self.lowest_stage(),
            ScaleOrientation::Unconfirmed => None,
        }
    }

    pub fn worst_stage(&self) -> Option<StageAverage> {
        match self.scale() {
            ScaleOrientation::HigherIsBetter => self.lowest_stage(),
            ScaleOrientation::LowerIsBetter => self.highest_stage(),
            ScaleOrientation::Unconfirmed => None,
        }
    }

    pub fn average_by_dimension(&self) -> Vec<DimensionAverage> {
        Dimension::ordered()
            .into_iter()
            .map(|dimension| {
                let selection = self.selection(dimension);
                let values = self.grid().rows().flat_map(|(_, row)| {
                    row.iter()
                        .filter(|(factor, _)| selection.contains(*factor))
                        .filter_map(|(_, cell)| cell.value())
                });
                DimensionAverage {
                    dimension,
                    average: mean(values),
                }
            })
            .collect()
    }

    /// Cells of one stage from the worst judgment to the best; unknown cells last.
    pub fn stage_breakdown(&self, stage: &str) -> Vec<BreakdownEntry> {
        let Some(row) = self.grid().row(stage) else {
            return Vec::new();
        };
        let mut entries: Vec<BreakdownEntry> = self
            .all_selected_factors()
            .into_iter()
            .filter_map(|factor| {
                row.get(&factor).map(|cell| BreakdownEntry {
                    score: cell.score,
                    note: cell.note.clone(),
                    factor,
                })
            })
            .collect();

        let lower_is_better = self.scale() == ScaleOrientation::LowerIsBetter;
        entries.sort_by_key(|entry| match entry.score {
            Some(score) if lower_is_better => (0, std::cmp::Reverse(score.value())),
            Some(score) => (0, std::cmp::Reverse(Score::MAX - score.value())),
            None => (1, std::cmp::Reverse(0)),
        });
        entries
    }

    pub fn progress(&self) -> ScoringProgress {
        let known = self
            .grid()
            .rows()
            .flat_map(|(_, row)| row.values())
            .filter(|cell| cell.is_known())
            .count();
        ScoringProgress {
            known,
            total: self.grid().cell_count(),
        }
    }

    fn pick_stage(&self, better: impl Fn(f64, f64) -> bool) -> Option<StageAverage> {
        let mut chosen: Option<StageAverage> = None;
        for entry in self.average_by_stage() {
            let Some(value) = entry.average else {
                continue;
            };
            let replace = match chosen.as_ref().and_then(|current| current.average) {
                Some(current) => better(value, current),
                None => true,
            };
            if replace {
                chosen = Some(entry);
            }
        }
        chosen
    }
}
