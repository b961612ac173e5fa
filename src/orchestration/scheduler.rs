use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use super::aggregator::{self, ProjectSummary};
use super::errors::{OrchestratorError, OrchestratorResult};
use crate::domain::agent::Agent;
use crate::domain::project::Project;
use crate::domain::task::{Task, TaskOutcome, TaskStatus};

/// Owns projects, their tasks, and the dependency edges between them
///
/// Every task transition recomputes the owning project's derived
/// status and progress before returning.
#[derive(Debug, Default)]
pub struct TaskGraph {
    projects: HashMap<Uuid, Project>,
    project_order: Vec<Uuid>,
    tasks: HashMap<Uuid, Task>,
    next_sequence: u64,
}

impl TaskGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_project(&mut self, project: Project) -> Uuid {
        let id = project.id();
        self.projects.insert(id, project);
        self.project_order.push(id);
        id
    }

    /// Removes a project that never received a task
    pub(crate) fn discard_empty_project(&mut self, project_id: Uuid) {
        let is_empty = self
            .projects
            .get(&project_id)
            .map(|p| p.tasks().is_empty())
            .unwrap_or(false);
        if is_empty {
            self.projects.remove(&project_id);
            self.project_order.retain(|id| *id != project_id);
        }
    }

    /// Inserts `task` into a project
    ///
    /// # Errors
    /// - `NotFound` for an unknown project, or a dependency that does not
    ///   exist in the same project
    /// - `CyclicDependency` when any dependency can already reach the new
    ///   task, including a task depending on itself
    /// - `InvalidTransition` when the task id is already taken
    ///
    /// The graph is untouched on error.
    pub fn add_task(&mut self, project_id: Uuid, mut task: Task) -> OrchestratorResult<Uuid> {
        if !self.projects.contains_key(&project_id) {
            return Err(OrchestratorError::project_not_found(project_id));
        }
        if self.tasks.contains_key(&task.id()) {
            return Err(OrchestratorError::InvalidTransition(format!(
                "Task {} already exists",
                task.id()
            )));
        }

        for &dependency in task.dependencies() {
            if dependency == task.id() || self.reaches(dependency, task.id()) {
                return Err(OrchestratorError::CyclicDependency {
                    task: task.id(),
                    dependency,
                });
            }
            match self.tasks.get(&dependency) {
                Some(dep) if dep.project_id() == Some(project_id) => {}
                _ => return Err(OrchestratorError::task_not_found(dependency)),
            }
        }

        let id = task.id();
        task.attach(project_id, self.next_sequence);
        self.next_sequence += 1;
        self.tasks.insert(id, task);
        if let Some(project) = self.projects.get_mut(&project_id) {
            project.push_task(id);
        }
        self.refresh(project_id);
        Ok(id)
    }

    /// Pending, non-cancelled tasks whose dependencies are all completed
    ///
    /// Ordered by priority (critical first), then creation order.
    pub fn runnable_tasks(&self, project_id: Uuid) -> OrchestratorResult<Vec<Task>> {
        let project = self.project(project_id)?;

        let mut runnable: Vec<&Task> = project
            .tasks()
            .iter()
            .filter_map(|id| self.tasks.get(id))
            .filter(|task| self.is_runnable(task))
            .collect();
        runnable.sort_by_key(|task| (std::cmp::Reverse(task.priority().rank()), task.sequence()));

        Ok(runnable.into_iter().cloned().collect())
    }

    /// Dependencies of `task_id` that have not completed yet
    pub fn unmet_dependencies(&self, task_id: Uuid) -> OrchestratorResult<Vec<Uuid>> {
        let task = self.task(task_id)?;
        Ok(task
            .dependencies()
            .iter()
            .filter(|dep| {
                self.tasks
                    .get(*dep)
                    .map(|d| d.status() != TaskStatus::Completed)
                    .unwrap_or(true)
            })
            .copied()
            .collect())
    }

    pub fn mark_started(&mut self, task_id: Uuid, agent: &Agent) -> OrchestratorResult<()> {
        let task = self
            .tasks
            .get_mut(&task_id)
            .ok_or_else(|| OrchestratorError::task_not_found(task_id))?;
        task.start(agent.id())
            .map_err(OrchestratorError::InvalidTransition)?;

        let project_id = task.project_id();
        if let Some(project) = project_id.and_then(|id| self.projects.get_mut(&id)) {
            project.add_agent(agent.id());
        }
        if let Some(project_id) = project_id {
            self.refresh(project_id);
        }
        Ok(())
    }

    pub fn mark_finished(
        &mut self,
        task_id: Uuid,
        outcome: TaskOutcome,
        result: Option<serde_json::Value>,
    ) -> OrchestratorResult<()> {
        let task = self
            .tasks
            .get_mut(&task_id)
            .ok_or_else(|| OrchestratorError::task_not_found(task_id))?;
        task.finish(outcome, result)
            .map_err(OrchestratorError::InvalidTransition)?;

        let project_id = task.project_id();
        if let Some(project_id) = project_id {
            self.refresh(project_id);
        }
        Ok(())
    }

    /// Withdraws a pending task from scheduling
    pub fn cancel(&mut self, task_id: Uuid) -> OrchestratorResult<()> {
        let task = self
            .tasks
            .get_mut(&task_id)
            .ok_or_else(|| OrchestratorError::task_not_found(task_id))?;
        task.cancel().map_err(OrchestratorError::InvalidTransition)?;

        let project_id = task.project_id();
        if let Some(project_id) = project_id {
            self.refresh(project_id);
        }
        Ok(())
    }

    pub fn task(&self, task_id: Uuid) -> OrchestratorResult<&Task> {
        self.tasks
            .get(&task_id)
            .ok_or_else(|| OrchestratorError::task_not_found(task_id))
    }

    pub fn contains_task(&self, task_id: Uuid) -> bool {
        self.tasks.contains_key(&task_id)
    }

    pub fn project(&self, project_id: Uuid) -> OrchestratorResult<&Project> {
        self.projects
            .get(&project_id)
            .ok_or_else(|| OrchestratorError::project_not_found(project_id))
    }

    /// Every project in creation order
    pub fn projects(&self) -> Vec<Project> {
        self.project_order
            .iter()
            .filter_map(|id| self.projects.get(id))
            .cloned()
            .collect()
    }

    /// Tasks of a project in insertion order
    pub fn project_tasks(&self, project_id: Uuid) -> OrchestratorResult<Vec<Task>> {
        let project = self.project(project_id)?;
        Ok(project
            .tasks()
            .iter()
            .filter_map(|id| self.tasks.get(id))
            .cloned()
            .collect())
    }

    pub fn summary(&self, project_id: Uuid) -> OrchestratorResult<ProjectSummary> {
        let project = self.project(project_id)?;
        let tasks = project.tasks().iter().filter_map(|id| self.tasks.get(id));
        Ok(aggregator::summary(project, tasks))
    }

    fn is_runnable(&self, task: &Task) -> bool {
        task.status() == TaskStatus::Pending
            && !task.is_cancelled()
            && task.dependencies().iter().all(|dep| {
                self.tasks
                    .get(dep)
                    .map(|d| d.status() == TaskStatus::Completed)
                    .unwrap_or(false)
            })
    }

    /// Whether `target` is reachable from `from` along dependency edges
    fn reaches(&self, from: Uuid, target: Uuid) -> bool {
        let mut stack = vec![from];
        let mut seen = HashSet::new();

        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            if let Some(task) = self.tasks.get(&current) {
                stack.extend(task.dependencies().iter().copied());
            }
        }
        false
    }

    fn refresh(&mut self, project_id: Uuid) {
        let Some(project) = self.projects.get_mut(&project_id) else {
            return;
        };
        let tasks: Vec<&Task> = project
            .tasks()
            .iter()
            .filter_map(|id| self.tasks.get(id))
            .collect();
        aggregator::recompute(project, tasks);
    }
}
