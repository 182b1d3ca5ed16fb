use super::catalog::{self, DEFAULT_LIFE_CYCLE};
use super::cell::{Score, ScoreCell};
use super::domain::{
    AssessmentError, Dimension, MoveDirection, ScaleOrientation, ScoreRejection, StagePolicy,
    StageRef, FACTORS_PER_DIMENSION,
};
use super::grid::ScoreGrid;
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub const DEFAULT_TRL: u8 = 4;

/// Aggregate root for one assessment: scoping, life cycle, factor choice and scores.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    name: String,
    pub description: String,
    trl: u8,
    pub core_function: String,
    pub functional_unit: String,
    pub scoping_notes: String,
    lifecycle_stages: Vec<String>,
    lifecycle_changed: BTreeMap<String, bool>,
    stage_sections: BTreeMap<String, String>,
    selected_factors: BTreeMap<Dimension, Vec<String>>,
    grid: ScoreGrid,
    scale: ScaleOrientation,
    policy: StagePolicy,
}

/// Raw parts used when rebuilding a project from a document.
#[derive(Debug, Default)]
pub(crate) struct ProjectParts {
    pub name: String,
    pub description: String,
    pub trl: u8,
    pub core_function: String,
    pub functional_unit: String,
    pub scoping_notes: String,
    pub lifecycle_stages: Vec<String>,
    pub lifecycle_changed: BTreeMap<String, bool>,
    pub stage_sections: BTreeMap<String, String>,
    pub selected_factors: BTreeMap<Dimension, Vec<String>>,
    pub grid: ScoreGrid,
    pub scale: ScaleOrientation,
}

impl Project {
    /// New project seeded with the default life cycle and no factor selection.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let mut project = Self {
            name: name.into(),
            description: description.into(),
            trl: DEFAULT_TRL,
            core_function: String::new(),
            functional_unit: String::new(),
            scoping_notes: String::new(),
            lifecycle_stages: Vec::new(),
            lifecycle_changed: BTreeMap::new(),
            stage_sections: BTreeMap::new(),
            selected_factors: BTreeMap::new(),
            grid: ScoreGrid::new(),
            scale: ScaleOrientation::default(),
            policy: StagePolicy::default(),
        };
        project.reset_stages_to_default();
        project
    }

    pub(crate) fn from_parts(parts: ProjectParts) -> Self {
        let ProjectParts {
            name,
            description,
            trl,
            core_function,
            functional_unit,
            scoping_notes,
            lifecycle_stages,
            mut lifecycle_changed,
            mut stage_sections,
            selected_factors,
            grid,
            scale,
        } = parts;

        lifecycle_changed.retain(|stage, _| lifecycle_stages.contains(stage));
        stage_sections.retain(|stage, _| lifecycle_stages.contains(stage));
        for stage in &lifecycle_stages {
            lifecycle_changed.entry(stage.clone()).or_insert(false);
        }

        let mut project = Self {
            name,
            description,
            trl,
            core_function,
            functional_unit,
            scoping_notes,
            lifecycle_stages,
            lifecycle_changed,
            stage_sections,
            selected_factors,
            grid,
            scale,
            policy: StagePolicy::default(),
        };
        project.reconcile_grid();
        project
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn trl(&self) -> u8 {
        self.trl
    }

    pub fn set_trl(&mut self, level: i64) -> Result<(), AssessmentError> {
        let level = u8::try_from(level)
            .ok()
            .filter(|level| catalog::trl_level(*level).is_some())
            .ok_or(AssessmentError::InvalidTrl(level))?;
        self.trl = level;
        Ok(())
    }

    pub fn scale(&self) -> ScaleOrientation {
        self.scale
    }

    pub fn set_scale(&mut self, scale: ScaleOrientation) {
        self.scale = scale;
    }

    pub fn policy(&self) -> StagePolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: StagePolicy) {
        self.policy = policy;
    }

    pub fn lifecycle_stages(&self) -> &[String] {
        &self.lifecycle_stages
    }

    pub fn lifecycle_changed(&self) -> &BTreeMap<String, bool> {
        &self.lifecycle_changed
    }

    pub fn stage_sections(&self) -> &BTreeMap<String, String> {
        &self.stage_sections
    }

    pub fn has_stage(&self, stage: &str) -> bool {
        self.lifecycle_stages.iter().any(|existing| existing == stage)
    }

    pub fn is_stage_changed(&self, stage: &str) -> bool {
        self.lifecycle_changed.get(stage).copied().unwrap_or(false)
    }

    pub fn stage_section(&self, stage: &str) -> Option<&str> {
        self.stage_sections.get(stage).map(String::as_str)
    }

    pub fn selected_factors(&self) -> &BTreeMap<Dimension, Vec<String>> {
        &self.selected_factors
    }

    pub fn selection(&self, dimension: Dimension) -> &[String] {
        self.selected_factors
            .get(&dimension)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Selected factor names across dimensions, in dimension order, without duplicates.
    pub fn all_selected_factors(&self) -> Vec<String> {
        let mut all: Vec<String> = Vec::new();
        for dimension in Dimension::ordered() {
            for name in self.selection(dimension) {
                if !all.contains(name) {
                    all.push(name.clone());
                }
            }
        }
        all
    }

    /// Dimension a selected factor was picked under.
    pub fn dimension_of(&self, factor: &str) -> Option<Dimension> {
        Dimension::ordered()
            .into_iter()
            .find(|dimension| self.selection(*dimension).iter().any(|name| name == factor))
    }

    pub fn grid(&self) -> &ScoreGrid {
        &self.grid
    }

    pub fn cell(&self, stage: &str, factor: &str) -> Option<&ScoreCell> {
        self.grid.cell(stage, factor)
    }

    /// Appends a stage, or returns the existing one when the name is taken.
    pub fn add_stage(
        &mut self,
        name: &str,
        section: Option<&str>,
    ) -> Result<StageRef, AssessmentError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AssessmentError::EmptyName);
        }

        if let Some(index) = self.stage_index(name) {
            return Ok(StageRef {
                index,
                name: name.to_string(),
            });
        }

        if self.lifecycle_stages.len() >= self.policy.max_stages {
            warn!(
                project = %self.name,
                stage = name,
                limit = self.policy.max_stages,
                "stage rejected, capacity reached"
            );
            return Err(AssessmentError::CapacityExceeded {
                limit: self.policy.max_stages,
            });
        }

        self.lifecycle_stages.push(name.to_string());
        self.lifecycle_changed.insert(name.to_string(), false);
        if let Some(section) = section.map(str::trim).filter(|value| !value.is_empty()) {
            self.stage_sections.insert(name.to_string(), section.to_string());
        }
        self.reconcile_grid();
        debug!(project = %self.name, stage = name, "stage added");

        Ok(StageRef {
            index: self.lifecycle_stages.len() - 1,
            name: name.to_string(),
        })
    }

    /// Renames a stage, carrying its flag, section and scores over.
    pub fn rename_stage(&mut self, old: &str, new: &str) -> Result<(), AssessmentError> {
        let new = new.trim();
        if new.is_empty() {
            return Err(AssessmentError::EmptyName);
        }
        let index = self
            .stage_index(old)
            .ok_or_else(|| AssessmentError::StageNotFound(old.to_string()))?;
        if old == new {
            return Ok(());
        }
        if self.has_stage(new) {
            return Err(AssessmentError::duplicate_stage(new));
        }

        self.lifecycle_stages[index] = new.to_string();
        let changed = self.lifecycle_changed.remove(old).unwrap_or(false);
        self.lifecycle_changed.insert(new.to_string(), changed);
        if let Some(section) = self.stage_sections.remove(old) {
            self.stage_sections.insert(new.to_string(), section);
        }
        self.grid.rename_row(old, new);
        self.reconcile_grid();
        debug!(project = %self.name, from = old, to = new, "stage renamed");
        Ok(())
    }

    /// Removes a stage and everything keyed by it. Absent stages are ignored.
    pub fn remove_stage(&mut self, name: &str) {
        let Some(index) = self.stage_index(name) else {
            return;
        };
        self.lifecycle_stages.remove(index);
        self.lifecycle_changed.remove(name);
        self.stage_sections.remove(name);
        self.grid.remove_row(name);
        self.reconcile_grid();
        debug!(project = %self.name, stage = name, "stage removed");
    }

    /// Swaps a stage with its neighbour. Returns `false` when nothing moved.
    pub fn move_stage(&mut self, name: &str, direction: MoveDirection) -> bool {
        let Some(index) = self.stage_index(name) else {
            return false;
        };
        let target = match direction {
            MoveDirection::Up if index > 0 => index - 1,
            MoveDirection::Down if index + 1 < self.lifecycle_stages.len() => index + 1,
            _ => return false,
        };
        self.lifecycle_stages.swap(index, target);
        true
    }

    pub fn set_stage_changed(&mut self, stage: &str, changed: bool) -> Result<(), AssessmentError> {
        if !self.has_stage(stage) {
            return Err(AssessmentError::StageNotFound(stage.to_string()));
        }
        self.lifecycle_changed.insert(stage.to_string(), changed);
        Ok(())
    }

    /// Replaces the stage list with the default life cycle, dropping custom stages.
    pub fn reset_stages_to_default(&mut self) {
        self.lifecycle_stages = DEFAULT_LIFE_CYCLE
            .iter()
            .map(|stage| stage.to_string())
            .collect();
        self.lifecycle_changed
            .retain(|stage, _| DEFAULT_LIFE_CYCLE.contains(&stage.as_str()));
        for stage in DEFAULT_LIFE_CYCLE {
            self.lifecycle_changed.entry(stage.to_string()).or_insert(false);
        }
        self.stage_sections.clear();
        self.reconcile_grid();
    }

    /// Replaces the selection of one dimension. Fewer than three names is allowed.
    pub fn set_factor_selection<I, S>(&mut self, dimension: Dimension, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            if !name.is_empty() && !selection.iter().any(|existing| existing == name) {
                selection.push(name.to_string());
            }
        }
        debug!(
            project = %self.name,
            %dimension,
            count = selection.len(),
            "factor selection updated"
        );
        self.selected_factors.insert(dimension, selection);
        self.reconcile_grid();
    }

    /// Applies the catalog's default-selected factors to every dimension.
    pub fn select_default_factors(&mut self) {
        for dimension in Dimension::ordered() {
            self.set_factor_selection(dimension, catalog::default_selection(dimension));
        }
    }

    pub fn set_score(
        &mut self,
        stage: &str,
        factor: &str,
        value: Option<i64>,
    ) -> Result<(), AssessmentError> {
        let score = value.map(Score::new).transpose()?;
        self.addressed_cell(stage, factor)?.score = score;
        Ok(())
    }

    pub fn set_note(
        &mut self,
        stage: &str,
        factor: &str,
        note: impl Into<String>,
    ) -> Result<(), AssessmentError> {
        self.addressed_cell(stage, factor)?.note = note.into();
        Ok(())
    }

    /// Functional unit filled in and at least one stage drafted.
    pub fn scoping_complete(&self) -> bool {
        !self.functional_unit.trim().is_empty() && !self.lifecycle_stages.is_empty()
    }

    /// Exactly three factors picked in every dimension.
    pub fn factor_selection_complete(&self) -> bool {
        Dimension::ordered()
            .into_iter()
            .all(|dimension| self.selection(dimension).len() == FACTORS_PER_DIMENSION)
            && self.all_selected_factors().len() == FACTORS_PER_DIMENSION * 3
    }

    pub fn ready_for_scoring(&self) -> bool {
        self.scoping_complete() && self.factor_selection_complete()
    }

    pub fn ready_for_results(&self) -> bool {
        self.ready_for_scoring() && !self.grid.is_empty()
    }

    fn stage_index(&self, name: &str) -> Option<usize> {
        self.lifecycle_stages.iter().position(|stage| stage == name)
    }

    fn addressed_cell(
        &mut self,
        stage: &str,
        factor: &str,
    ) -> Result<&mut ScoreCell, ScoreRejection> {
        if !self.has_stage(stage) {
            return Err(ScoreRejection::UnknownStage(stage.to_string()));
        }
        if self.dimension_of(factor).is_none() {
            return Err(ScoreRejection::UnknownFactor(factor.to_string()));
        }
        self.grid
            .cell_mut(stage, factor)
            .ok_or_else(|| ScoreRejection::UnknownFactor(factor.to_string()))
    }

    fn reconcile_grid(&mut self) {
        let factors = self.all_selected_factors();
        self.grid.reconcile(&self.lifecycle_stages, &factors);
    }
}
