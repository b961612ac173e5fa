use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur in the orchestration engine
///
/// Validation errors never leave partial state behind. Execution errors
/// are recorded on the failed task instead of being returned.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OrchestratorError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Agent already registered: {0}")]
    DuplicateAgent(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Dependency on {dependency} would make task {task} part of a cycle")]
    CyclicDependency { task: Uuid, dependency: Uuid },

    #[error("No eligible agent available for {0} task")]
    NoEligibleAgent(String),

    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    #[error("Project request cannot be empty")]
    EmptyRequest,

    #[error("Task {task} is waiting on unfinished dependencies: {pending:?}")]
    DependenciesUnmet { task: Uuid, pending: Vec<Uuid> },

    #[error("Invalid task plan: {0}")]
    InvalidPlan(String),

    #[error("Task execution timed out after {0:?}")]
    ExecutionTimeout(Duration),

    #[error("Task execution failed: {0}")]
    ExecutionFailed(String),
}

impl OrchestratorError {
    pub fn agent_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "Agent",
            id: id.into(),
        }
    }

    pub fn task_not_found(id: Uuid) -> Self {
        Self::NotFound {
            kind: "Task",
            id: id.to_string(),
        }
    }

    pub fn project_not_found(id: Uuid) -> Self {
        Self::NotFound {
            kind: "Project",
            id: id.to_string(),
        }
    }
}

pub type OrchestratorResult<T> = Result<T, OrchestratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_entity() {
        let err = OrchestratorError::agent_not_found("ghost");
        assert_eq!(err.to_string(), "Agent not found: ghost");

        let id = Uuid::new_v4();
        assert_eq!(
            OrchestratorError::project_not_found(id).to_string(),
            format!("Project not found: {}", id)
        );
    }

    #[test]
    fn timeout_renders_duration() {
        let err = OrchestratorError::ExecutionTimeout(Duration::from_millis(1500));
        assert_eq!(err.to_string(), "Task execution timed out after 1.5s");
    }
}
