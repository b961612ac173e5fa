// Project aggregation
//
// Pure derivation of a project's status and progress from its tasks.
// Withdrawn (cancelled) tasks are left out of every count.

use serde::Serialize;
use uuid::Uuid;

use crate::domain::project::{Project, ProjectStatus};
use crate::domain::task::{Task, TaskStatus};

/// Number of tasks in each status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCounts {
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub failed: usize,
}

impl TaskCounts {
    pub fn tally<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut counts = Self::default();
        for task in tasks.into_iter().filter(|t| !t.is_cancelled()) {
            match task.status() {
                TaskStatus::Pending => counts.pending += 1,
                TaskStatus::InProgress => counts.in_progress += 1,
                TaskStatus::Completed => counts.completed += 1,
                TaskStatus::Failed => counts.failed += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.pending + self.in_progress + self.completed + self.failed
    }
}

/// Display summary of one project
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub project_id: Uuid,
    pub status: ProjectStatus,
    pub progress: u8,
    pub task_counts: TaskCounts,
    pub agent_count: usize,
}

/// round(100 * completed / total), 0 for an empty project
pub fn derive_progress(counts: &TaskCounts) -> u8 {
    let total = counts.total();
    if total == 0 {
        return 0;
    }
    // Integer round-half-up of 100 * completed / total
    ((200 * counts.completed + total) / (2 * total)) as u8
}

pub fn derive_status(counts: &TaskCounts) -> ProjectStatus {
    let total = counts.total();
    if total > 0 && counts.completed == total {
        ProjectStatus::Completed
    } else if counts.failed > 0 {
        ProjectStatus::Failed
    } else if counts.in_progress > 0 || counts.completed > 0 {
        ProjectStatus::InProgress
    } else {
        ProjectStatus::Planning
    }
}

/// Writes the derived status and progress back onto `project`
pub fn recompute<'a>(project: &mut Project, tasks: impl IntoIterator<Item = &'a Task>) {
    let counts = TaskCounts::tally(tasks);
    project.apply_derivation(derive_status(&counts), derive_progress(&counts));
}

pub fn summary<'a>(project: &Project, tasks: impl IntoIterator<Item = &'a Task>) -> ProjectSummary {
    let counts = TaskCounts::tally(tasks);
    ProjectSummary {
        project_id: project.id(),
        status: derive_status(&counts),
        progress: derive_progress(&counts),
        task_counts: counts,
        agent_count: project.agents().len(),
    }
}
