use async_trait::async_trait;
use uuid::Uuid;

use super::errors::{OrchestratorError, OrchestratorResult};
use super::types::TaskDraft;
use crate::domain::task::{Task, TaskPriority, TaskType};

/// Turns a natural-language request into an initial task plan
#[async_trait]
pub trait Decomposer: Send + Sync {
    async fn decompose(&self, request: &str) -> OrchestratorResult<Vec<TaskDraft>>;
}

/// Decomposer that lays out the standard delivery pipeline
///
/// ```text
/// coordinate -> requirements -> architecture -> backend  -> tests -> deploy
///                          └--> ui design    -> frontend -┘
/// ```
#[derive(Debug, Clone, Default)]
pub struct RoleBasedDecomposer;

#[async_trait]
impl Decomposer for RoleBasedDecomposer {
    async fn decompose(&self, request: &str) -> OrchestratorResult<Vec<TaskDraft>> {
        Ok(vec![
            TaskDraft::new(
                TaskType::CoordinateProject,
                format!("Coordinate delivery of: {}", request),
            )
            .priority(TaskPriority::Critical),
            TaskDraft::new(
                TaskType::AnalyzeRequirements,
                format!("Write requirements and user stories for: {}", request),
            )
            .priority(TaskPriority::High)
            .after([0]),
            TaskDraft::new(
                TaskType::DesignArchitecture,
                "Design the system architecture and pick the technology stack",
            )
            .priority(TaskPriority::High)
            .after([1]),
            TaskDraft::new(TaskType::DesignUi, "Design the user interface and main flows")
                .after([1]),
            TaskDraft::new(
                TaskType::ImplementBackend,
                "Implement the backend services and data model",
            )
            .after([2]),
            TaskDraft::new(
                TaskType::ImplementFrontend,
                "Implement the frontend against the UI design and backend API",
            )
            .after([2, 3]),
            TaskDraft::new(TaskType::RunTests, "Test the integrated application")
                .priority(TaskPriority::High)
                .after([4, 5]),
            TaskDraft::new(TaskType::Deploy, "Deploy the application").after([6]),
        ])
    }
}

/// Fallback plan used when decomposition fails
pub fn coordination_only(request: &str) -> Vec<TaskDraft> {
    vec![TaskDraft::new(
        TaskType::CoordinateProject,
        format!("Coordinate delivery of: {}", request),
    )
    .priority(TaskPriority::Critical)]
}

/// Converts drafts into tasks with real ids
///
/// A coordination task is prepended when the plan has none. Draft
/// dependencies must point at earlier drafts, which keeps the plan
/// acyclic by construction.
pub fn materialize(request: &str, mut drafts: Vec<TaskDraft>) -> OrchestratorResult<Vec<Task>> {
    if !drafts
        .iter()
        .any(|d| d.task_type == TaskType::CoordinateProject)
    {
        for draft in &mut drafts {
            for index in &mut draft.depends_on {
                *index += 1;
            }
        }
        drafts.insert(0, coordination_only(request).remove(0));
    }

    let ids: Vec<Uuid> = drafts.iter().map(|_| Uuid::new_v4()).collect();
    let mut tasks = Vec::with_capacity(drafts.len());

    for (position, draft) in drafts.into_iter().enumerate() {
        let mut dependencies = Vec::with_capacity(draft.depends_on.len());
        for index in draft.depends_on {
            if index >= position {
                return Err(OrchestratorError::InvalidPlan(format!(
                    "draft {} depends on draft {}, which does not come before it",
                    position, index
                )));
            }
            dependencies.push(ids[index]);
        }

        let task = Task::new(draft.task_type, draft.description)
            .map_err(OrchestratorError::InvalidPlan)?
            .with_id(ids[position])
            .with_priority(draft.priority)
            .with_dependencies(dependencies);
        tasks.push(task);
    }

    Ok(tasks)
}
