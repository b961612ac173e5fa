use super::value_objects::ProjectStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

const NAME_LIMIT: usize = 50;

/// Project aggregate root
///
/// Owns an ordered list of task ids and the set of agents that have
/// worked on them. Status and progress are derived from the tasks and
/// only written back by the aggregator.
///
/// # Example
/// ```
/// use devteam_orchestrator::domain::project::{Project, ProjectStatus};
///
/// let project = Project::from_request("Build a todo app with login").expect("valid request");
///
/// assert_eq!(project.name(), "Build a todo app with login");
/// assert_eq!(project.status(), ProjectStatus::Planning);
/// assert_eq!(project.progress(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    id: Uuid,
    name: String,
    description: String,
    status: ProjectStatus,
    tasks: Vec<Uuid>,
    agents: Vec<String>,
    progress: u8,
    created_at: DateTime<Utc>,
}

impl Project {
    /// Creates an empty project in planning
    ///
    /// # Business Rules Enforced
    /// - Name must not be blank
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err("Project name cannot be empty".to_string());
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            description: description.into(),
            status: ProjectStatus::Planning,
            tasks: Vec::new(),
            agents: Vec::new(),
            progress: 0,
            created_at: Utc::now(),
        })
    }

    /// Creates a project whose name is the first 50 characters of the
    /// request and whose description is the full request
    pub fn from_request(request: &str) -> Result<Self, String> {
        let request = request.trim();
        if request.is_empty() {
            return Err("Project request cannot be empty".to_string());
        }

        let mut name: String = request.chars().take(NAME_LIMIT).collect();
        if request.chars().count() > NAME_LIMIT {
            name = format!("{}...", name.trim_end());
        }

        Self::new(name, request)
    }

    pub(crate) fn push_task(&mut self, task_id: Uuid) {
        self.tasks.push(task_id);
    }

    pub(crate) fn add_agent(&mut self, agent_id: &str) {
        if !self.agents.iter().any(|a| a == agent_id) {
            self.agents.push(agent_id.to_string());
        }
    }

    pub(crate) fn apply_derivation(&mut self, status: ProjectStatus, progress: u8) {
        self.status = status;
        self.progress = progress;
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> ProjectStatus {
        self.status
    }

    pub fn tasks(&self) -> &[Uuid] {
        &self.tasks
    }

    pub fn agents(&self) -> &[String] {
        &self.agents
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
