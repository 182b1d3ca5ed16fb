use super::cell::ScoreCell;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Stage name -> factor name -> cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreGrid {
    rows: BTreeMap<String, BTreeMap<String, ScoreCell>>,
}

impl ScoreGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_rows(rows: BTreeMap<String, BTreeMap<String, ScoreCell>>) -> Self {
        Self { rows }
    }

    pub fn cell(&self, stage: &str, factor: &str) -> Option<&ScoreCell> {
        self.rows.get(stage).and_then(|row| row.get(factor))
    }

    pub(crate) fn cell_mut(&mut self, stage: &str, factor: &str) -> Option<&mut ScoreCell> {
        self.rows.get_mut(stage).and_then(|row| row.get_mut(factor))
    }

    pub fn row(&self, stage: &str) -> Option<&BTreeMap<String, ScoreCell>> {
        self.rows.get(stage)
    }

    pub fn rows(&self) -> impl Iterator<Item = (&String, &BTreeMap<String, ScoreCell>)> {
        self.rows.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell_count(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }

    pub(crate) fn rename_row(&mut self, old: &str, new: &str) {
        if let Some(row) = self.rows.remove(old) {
            self.rows.insert(new.to_string(), row);
        }
    }

    pub(crate) fn remove_row(&mut self, stage: &str) {
        self.rows.remove(stage);
    }

    /// Makes the grid hold exactly one cell per (stage, factor) pair.
    ///
    /// Missing pairs are created as unknown; rows and columns outside the given
    /// stages and factors are dropped.
    pub(crate) fn reconcile(&mut self, stages: &[String], factors: &[String]) {
        let stage_set: BTreeSet<&str> = stages.iter().map(String::as_str).collect();
        let factor_set: BTreeSet<&str> = factors.iter().map(String::as_str).collect();

        self.rows.retain(|stage, _| stage_set.contains(stage.as_str()));

        for stage in stages {
            let row = self.rows.entry(stage.clone()).or_default();
            row.retain(|factor, _| factor_set.contains(factor.as_str()));
            for factor in factors {
                row.entry(factor.clone()).or_default();
            }
        }
    }
}
