// Shared orchestration state
//
// Registry and task graph live behind one lock so that agent selection,
// the agent transition and the task transition happen as one step.

use std::collections::HashMap;

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::errors::{OrchestratorError, OrchestratorResult};
use super::executor::profile_for;
use super::registry::AgentRegistry;
use super::scheduler::TaskGraph;
use super::types::{AgentProfile, ExecutionOutcome, ExecutionReport};
use crate::domain::agent::AgentStatus;
use crate::domain::project::Project;
use crate::domain::task::{Task, TaskOutcome, TaskStatus};

const IMPLICIT_PROJECT_NAME: &str = "Ad-hoc tasks";

/// Everything needed to run a task once it has been claimed
#[derive(Debug)]
pub struct ClaimedTask {
    pub task: Task,
    pub agent: AgentProfile,
    pub cancellation: CancellationToken,
}

#[derive(Debug, Default)]
pub struct OrchestrationState {
    pub registry: AgentRegistry,
    pub graph: TaskGraph,
    implicit_project: Option<Uuid>,
    in_flight: HashMap<Uuid, CancellationToken>,
}

impl OrchestrationState {
    pub fn new(registry: AgentRegistry) -> Self {
        Self {
            registry,
            ..Self::default()
        }
    }

    /// Project for tasks submitted without one, created on first use
    pub fn implicit_project(&mut self) -> OrchestratorResult<Uuid> {
        if let Some(id) = self.implicit_project {
            return Ok(id);
        }
        let project = Project::new(IMPLICIT_PROJECT_NAME, "Tasks submitted without a project")
            .map_err(OrchestratorError::InvalidPlan)?;
        let id = self.graph.create_project(project);
        self.implicit_project = Some(id);
        Ok(id)
    }

    pub fn has_implicit_project(&self) -> bool {
        self.implicit_project.is_some()
    }

    /// Drops the implicit project again while it is still empty
    pub fn discard_implicit_project(&mut self) {
        if let Some(id) = self.implicit_project {
            self.graph.discard_empty_project(id);
            if self.graph.project(id).is_err() {
                self.implicit_project = None;
            }
        }
    }

    /// Picks an agent for a pending task and moves both into work
    ///
    /// Nothing changes unless every check passes.
    pub fn claim(&mut self, task_id: Uuid) -> OrchestratorResult<ClaimedTask> {
        self.claim_with(task_id, None)
    }

    /// Like [`claim`](Self::claim), but pinned to `requested` when given
    pub fn claim_with(
        &mut self,
        task_id: Uuid,
        requested: Option<&str>,
    ) -> OrchestratorResult<ClaimedTask> {
        let task = self.graph.task(task_id)?;
        if task.status() != TaskStatus::Pending || task.is_cancelled() {
            return Err(OrchestratorError::InvalidTransition(format!(
                "Task {} is {}{} and cannot be started",
                task_id,
                task.status(),
                if task.is_cancelled() { " (cancelled)" } else { "" }
            )));
        }
        let task_type = task.task_type();

        let pending = self.graph.unmet_dependencies(task_id)?;
        if !pending.is_empty() {
            return Err(OrchestratorError::DependenciesUnmet {
                task: task_id,
                pending,
            });
        }

        let agent = match requested {
            Some(id) => self.registry.select_named(id, task_type)?,
            None => self.registry.select_for(task_type)?,
        }
        .clone();
        let previous = agent.status();

        self.registry
            .transition(agent.id(), AgentStatus::Working, Some(task_id))?;
        if let Err(err) = self.graph.mark_started(task_id, &agent) {
            self.registry.transition(agent.id(), previous, None)?;
            return Err(err);
        }

        let cancellation = CancellationToken::new();
        self.in_flight.insert(task_id, cancellation.clone());

        Ok(ClaimedTask {
            task: self.graph.task(task_id)?.clone(),
            agent: profile_for(&agent),
            cancellation,
        })
    }

    /// Records the outcome of a claimed task and releases its agent
    ///
    /// Success and timeout return the agent to idle; failure leaves it
    /// in error until its next assignment.
    pub fn release(
        &mut self,
        task_id: Uuid,
        agent_id: &str,
        report: &ExecutionReport,
        error: Option<&str>,
    ) -> OrchestratorResult<Task> {
        self.in_flight.remove(&task_id);

        let (outcome, result, agent_status) = match report.outcome {
            ExecutionOutcome::Success => (
                TaskOutcome::Completed,
                report.result.clone(),
                AgentStatus::Idle,
            ),
            ExecutionOutcome::Failure => (
                TaskOutcome::Failed,
                serde_json::json!({ "error": error, "details": report.result }),
                AgentStatus::Error,
            ),
            ExecutionOutcome::Timeout => (
                TaskOutcome::Failed,
                serde_json::json!({ "error": error, "timeout": true }),
                AgentStatus::Idle,
            ),
        };

        self.graph.mark_finished(task_id, outcome, Some(result))?;
        self.registry.transition(agent_id, agent_status, None)?;
        if outcome == TaskOutcome::Completed {
            self.registry.record_completion(agent_id, task_id)?;
        }

        Ok(self.graph.task(task_id)?.clone())
    }

    /// Signals an in-flight task, if there is one
    pub fn signal_cancellation(&self, task_id: Uuid) -> bool {
        match self.in_flight.get(&task_id) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::agent::{Agent, AgentType};
    use crate::domain::task::TaskType;

    fn state() -> OrchestrationState {
        let mut registry = AgentRegistry::new();
        registry
            .register(Agent::new("qa", "Quinn", AgentType::QaTester, ["testing"]))
            .unwrap();
        OrchestrationState::new(registry)
    }

    fn add(state: &mut OrchestrationState, deps: Vec<Uuid>) -> Uuid {
        let project = state.implicit_project().unwrap();
        let task = Task::new(TaskType::RunTests, "Run the suite")
            .unwrap()
            .with_dependencies(deps);
        state.graph.add_task(project, task).unwrap()
    }

    #[test]
    fn implicit_project_is_created_once() {
        let mut state = state();
        let first = state.implicit_project().unwrap();
        let second = state.implicit_project().unwrap();

        assert_eq!(first, second);
        assert_eq!(state.graph.projects().len(), 1);
    }

    #[test]
    fn claim_moves_agent_and_task_together() {
        let mut state = state();
        let task_id = add(&mut state, vec![]);

        let claimed = state.claim(task_id).unwrap();

        assert_eq!(claimed.agent.id, "qa");
        assert_eq!(claimed.task.status(), TaskStatus::InProgress);
        let agent = state.registry.get("qa").unwrap();
        assert_eq!(agent.status(), AgentStatus::Working);
        assert_eq!(agent.current_task(), Some(task_id));
    }

    #[test]
    fn claim_with_busy_agent_leaves_task_pending() {
        let mut state = state();
        let first = add(&mut state, vec![]);
        let second = add(&mut state, vec![]);
        state.claim(first).unwrap();

        let result = state.claim(second);

        assert!(matches!(result, Err(OrchestratorError::NoEligibleAgent(_))));
        assert_eq!(state.graph.task(second).unwrap().status(), TaskStatus::Pending);
    }

    #[test]
    fn claim_with_unmet_dependencies_fails() {
        let mut state = state();
        let first = add(&mut state, vec![]);
        let second = add(&mut state, vec![first]);

        let result = state.claim(second);

        assert_eq!(
            result.map(|c| c.task.id()),
            Err(OrchestratorError::DependenciesUnmet {
                task: second,
                pending: vec![first]
            })
        );
        assert_eq!(state.registry.get("qa").unwrap().status(), AgentStatus::Idle);
    }

    #[test]
    fn release_success_returns_agent_to_idle() {
        let mut state = state();
        let task_id = add(&mut state, vec![]);
        state.claim(task_id).unwrap();

        let task = state
            .release(task_id, "qa", &ExecutionReport::success(serde_json::json!("ok")), None)
            .unwrap();

        assert_eq!(task.status(), TaskStatus::Completed);
        let agent = state.registry.get("qa").unwrap();
        assert_eq!(agent.status(), AgentStatus::Idle);
        assert_eq!(agent.completed_tasks(), [task_id]);
    }

    #[test]
    fn release_failure_marks_agent_error() {
        let mut state = state();
        let task_id = add(&mut state, vec![]);
        state.claim(task_id).unwrap();

        let task = state
            .release(task_id, "qa", &ExecutionReport::failure("boom"), Some("boom"))
            .unwrap();

        assert_eq!(task.status(), TaskStatus::Failed);
        assert_eq!(task.result().unwrap()["error"], "boom");
        let agent = state.registry.get("qa").unwrap();
        assert_eq!(agent.status(), AgentStatus::Error);
        assert!(agent.completed_tasks().is_empty());
    }

    #[test]
    fn cancellation_only_signals_in_flight_tasks() {
        let mut state = state();
        let task_id = add(&mut state, vec![]);
        assert!(!state.signal_cancellation(task_id));

        let claimed = state.claim(task_id).unwrap();
        assert!(state.signal_cancellation(task_id));
        assert!(claimed.cancellation.is_cancelled());
    }

    #[test]
    fn claim_with_requested_agent_rejects_incapable_agent() {
        let mut registry = AgentRegistry::new();
        for agent in [
            Agent::new("qa", "Quinn", AgentType::QaTester, ["testing"]),
            Agent::new("qa-2", "Quill", AgentType::QaTester, ["testing"]),
            Agent::new("ops", "Oz", AgentType::Devops, ["deployment"]),
        ] {
            registry.register(agent).unwrap();
        }
        let mut state = OrchestrationState::new(registry);
        let task_id = add(&mut state, vec![]);

        assert!(matches!(
            state.claim_with(task_id, Some("ops")),
            Err(OrchestratorError::NoEligibleAgent(_))
        ));
        assert!(matches!(
            state.claim_with(task_id, Some("nobody")),
            Err(OrchestratorError::NotFound { .. })
        ));
        assert_eq!(state.graph.task(task_id).unwrap().status(), TaskStatus::Pending);

        let claimed = state.claim_with(task_id, Some("qa-2")).unwrap();
        assert_eq!(claimed.agent.id, "qa-2");
        assert_eq!(state.registry.get("qa").unwrap().status(), AgentStatus::Idle);
    }

    #[test]
    fn empty_implicit_project_can_be_discarded() {
        let mut state = state();
        state.implicit_project().unwrap();
        assert!(state.has_implicit_project());

        state.discard_implicit_project();

        assert!(!state.has_implicit_project());
        assert!(state.graph.projects().is_empty());

        // Non-empty implicit projects stay
        add(&mut state, vec![]);
        state.discard_implicit_project();
        assert!(state.has_implicit_project());
        assert_eq!(state.graph.projects().len(), 1);
    }
}
