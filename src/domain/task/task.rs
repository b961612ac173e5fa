use super::value_objects::{TaskOutcome, TaskPriority, TaskStatus, TaskType};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A unit of work owned by exactly one project
///
/// # Invariants
/// - Dependencies are unique and never include the task itself
/// - Status only moves Pending -> InProgress -> Completed | Failed
/// - Dependencies never change once the task is inserted into a graph
///
/// # Example
/// ```
/// use devteam_orchestrator::domain::task::{Task, TaskPriority, TaskStatus, TaskType};
///
/// let task = Task::new(TaskType::DesignUi, "Sketch the landing page")
///     .expect("valid task")
///     .with_priority(TaskPriority::High);
///
/// assert_eq!(task.status(), TaskStatus::Pending);
/// assert_eq!(task.priority(), TaskPriority::High);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: Uuid,
    project_id: Option<Uuid>,
    #[serde(skip)]
    sequence: u64,
    #[serde(rename = "type")]
    task_type: TaskType,
    description: String,
    priority: TaskPriority,
    status: TaskStatus,
    dependencies: Vec<Uuid>,
    assigned_agent: Option<String>,
    result: Option<serde_json::Value>,
    cancelled: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a pending, medium-priority task with no dependencies
    ///
    /// # Business Rules Enforced
    /// - Description must not be blank
    pub fn new(task_type: TaskType, description: impl Into<String>) -> Result<Self, String> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err("Task description cannot be empty".to_string());
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            project_id: None,
            sequence: 0,
            task_type,
            description,
            priority: TaskPriority::default(),
            status: TaskStatus::Pending,
            dependencies: Vec::new(),
            assigned_agent: None,
            result: None,
            cancelled: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Uses a caller-chosen id instead of a generated one
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the dependency list, dropping repeated ids
    pub fn with_dependencies(mut self, dependencies: impl IntoIterator<Item = Uuid>) -> Self {
        let mut unique = Vec::new();
        for dependency in dependencies {
            if !unique.contains(&dependency) {
                unique.push(dependency);
            }
        }
        self.dependencies = unique;
        self
    }

    /// Binds the task to its owning project and creation slot
    pub(crate) fn attach(&mut self, project_id: Uuid, sequence: u64) {
        self.project_id = Some(project_id);
        self.sequence = sequence;
    }

    /// Starts the task on behalf of `agent_id`
    ///
    /// # Business Rules
    /// - Task must be pending and not withdrawn
    pub fn start(&mut self, agent_id: &str) -> Result<(), String> {
        if self.cancelled {
            return Err(format!("Task {} was cancelled", self.id));
        }
        self.move_to(TaskStatus::InProgress)?;
        self.assigned_agent = Some(agent_id.to_string());
        Ok(())
    }

    /// Finishes an in-progress task with `outcome`
    pub fn finish(
        &mut self,
        outcome: TaskOutcome,
        result: Option<serde_json::Value>,
    ) -> Result<(), String> {
        self.move_to(outcome.into())?;
        self.result = result;
        Ok(())
    }

    /// Withdraws a pending task from scheduling
    pub fn cancel(&mut self) -> Result<(), String> {
        if self.status != TaskStatus::Pending {
            return Err(format!("Cannot cancel task in {} status", self.status));
        }
        if self.cancelled {
            return Err(format!("Task {} is already cancelled", self.id));
        }
        self.cancelled = true;
        self.updated_at = Utc::now();
        Ok(())
    }

    fn move_to(&mut self, next: TaskStatus) -> Result<(), String> {
        if !self.status.can_transition_to(next) {
            return Err(format!(
                "Cannot move task {} from {} to {}",
                self.id, self.status, next
            ));
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn project_id(&self) -> Option<Uuid> {
        self.project_id
    }

    /// Creation slot within the graph, used as the FIFO tie-break
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn task_type(&self) -> TaskType {
        self.task_type
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn priority(&self) -> TaskPriority {
        self.priority
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn dependencies(&self) -> &[Uuid] {
        &self.dependencies
    }

    pub fn assigned_agent(&self) -> Option<&str> {
        self.assigned_agent.as_deref()
    }

    pub fn result(&self) -> Option<&serde_json::Value> {
        self.result.as_ref()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn task() -> Task {
        Task::new(TaskType::ImplementBackend, "Build the orders API").unwrap()
    }

    #[test]
    fn create_task_with_defaults() {
        let task = task();

        assert_eq!(task.status(), TaskStatus::Pending);
        assert_eq!(task.priority(), TaskPriority::Medium);
        assert!(task.dependencies().is_empty());
        assert!(task.assigned_agent().is_none());
        assert!(task.project_id().is_none());
        assert!(!task.is_cancelled());
    }

    #[test]
    fn create_task_with_blank_description_fails() {
        let result = Task::new(TaskType::Deploy, "   ");

        assert!(result.is_err());
        assert!(result.unwrap_err().contains("cannot be empty"));
    }

    #[test]
    fn dependencies_are_deduplicated() {
        let dep = Uuid::new_v4();
        let task = task().with_dependencies([dep, dep, Uuid::new_v4()]);

        assert_eq!(task.dependencies().len(), 2);
        assert_eq!(task.dependencies()[0], dep);
    }

    #[test]
    fn start_then_complete() {
        let mut task = task();

        task.start("backend_developer").unwrap();
        assert_eq!(task.status(), TaskStatus::InProgress);
        assert_eq!(task.assigned_agent(), Some("backend_developer"));

        task.finish(TaskOutcome::Completed, Some(json!({"ok": true})))
            .unwrap();
        assert_eq!(task.status(), TaskStatus::Completed);
        assert_eq!(task.result(), Some(&json!({"ok": true})));
    }

    #[test]
    fn finish_requires_in_progress() {
        let mut task = task();

        assert!(task.finish(TaskOutcome::Completed, None).is_err());
        assert_eq!(task.status(), TaskStatus::Pending);
    }

    #[test]
    fn refinishing_terminal_task_fails() {
        let mut task = task();
        task.start("backend_developer").unwrap();
        task.finish(TaskOutcome::Failed, None).unwrap();

        assert!(task.finish(TaskOutcome::Completed, None).is_err());
        assert_eq!(task.status(), TaskStatus::Failed);
    }

    #[test]
    fn starting_twice_fails() {
        let mut task = task();
        task.start("a").unwrap();

        assert!(task.start("b").is_err());
        assert_eq!(task.assigned_agent(), Some("a"));
    }

    #[test]
    fn cancelled_task_cannot_start() {
        let mut task = task();
        task.cancel().unwrap();

        assert!(task.is_cancelled());
        assert!(task.start("a").is_err());
        assert_eq!(task.status(), TaskStatus::Pending);
    }

    #[test]
    fn cannot_cancel_in_progress_task() {
        let mut task = task();
        task.start("a").unwrap();

        assert!(task.cancel().is_err());
    }
}
