use super::document::{export_document, ImportError, ProjectDocument};
use super::domain::{AssessmentError, StagePolicy};
use super::project::Project;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use tracing::info;

/// Projects held by the application, keyed by name, plus the one being edited.
#[derive(Debug, Default)]
pub struct Workspace {
    projects: BTreeMap<String, Project>,
    active: Option<String>,
    policy: StagePolicy,
}

/// What to do when an imported document names an existing project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportConflict {
    Reject,
    Replace,
}

impl Workspace {
    pub fn new(policy: StagePolicy) -> Self {
        Self {
            projects: BTreeMap::new(),
            active: None,
            policy,
        }
    }

    pub fn policy(&self) -> StagePolicy {
        self.policy
    }

    pub fn names(&self) -> Vec<String> {
        self.projects.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Project> {
        self.projects.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Project> {
        self.projects.get_mut(name)
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active(&self) -> Option<&Project> {
        self.active.as_deref().and_then(|name| self.projects.get(name))
    }

    pub fn active_mut(&mut self) -> Option<&mut Project> {
        match self.active.as_deref() {
            Some(name) => self.projects.get_mut(name),
            None => None,
        }
    }

    /// Creates a project and makes it active.
    pub fn create(
        &mut self,
        name: &str,
        description: &str,
    ) -> Result<&mut Project, AssessmentError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AssessmentError::EmptyName);
        }
        if self.projects.contains_key(name) {
            return Err(AssessmentError::duplicate_project(name));
        }

        let mut project = Project::new(name, description);
        project.set_policy(self.policy);
        info!(project = name, "project created");
        Ok(self.insert_active(project))
    }

    pub fn open(&mut self, name: &str) -> Result<&mut Project, AssessmentError> {
        let project = self
            .projects
            .get_mut(name)
            .ok_or_else(|| AssessmentError::ProjectNotFound(name.to_string()))?;
        self.active = Some(name.to_string());
        Ok(project)
    }

    /// Removes a project; clears the active selection if it pointed at it.
    pub fn delete(&mut self, name: &str) -> Option<Project> {
        let removed = self.projects.remove(name)?;
        if self.active.as_deref() == Some(name) {
            self.active = None;
        }
        info!(project = name, "project deleted");
        Some(removed)
    }

    /// Parses `raw` and adds the project, making it active. On any failure the
    /// workspace is left exactly as it was.
    pub fn import(
        &mut self,
        raw: &str,
        on_conflict: ImportConflict,
    ) -> Result<&mut Project, AssessmentError> {
        let document = ProjectDocument::parse(raw)?;
        self.import_document(document, on_conflict)
    }

    pub fn import_document(
        &mut self,
        document: ProjectDocument,
        on_conflict: ImportConflict,
    ) -> Result<&mut Project, AssessmentError> {
        let mut project = document.into_project();
        if on_conflict == ImportConflict::Reject && self.projects.contains_key(project.name()) {
            return Err(AssessmentError::duplicate_project(project.name()));
        }
        if project.lifecycle_stages().len() > self.policy.max_stages {
            return Err(ImportError::InvalidField {
                field: "lifecycle_stages".to_string(),
                reason: format!(
                    "{} stages exceed the limit of {}",
                    project.lifecycle_stages().len(),
                    self.policy.max_stages
                ),
            }
            .into());
        }

        project.set_policy(self.policy);
        info!(project = project.name(), "project imported");
        Ok(self.insert_active(project))
    }

    pub fn export(&self, name: &str) -> Result<ProjectDocument, AssessmentError> {
        self.projects
            .get(name)
            .map(export_document)
            .ok_or_else(|| AssessmentError::ProjectNotFound(name.to_string()))
    }

    fn insert_active(&mut self, project: Project) -> &mut Project {
        let name = project.name().to_string();
        self.active = Some(name.clone());
        match self.projects.entry(name) {
            Entry::Occupied(mut slot) => {
                slot.insert(project);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(project),
        }
    }
}
