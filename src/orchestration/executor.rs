use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use super::prompts::library;
use super::types::{AgentProfile, ExecutionReport};
use crate::domain::agent::Agent;
use crate::domain::task::Task;

/// The capability that actually performs a task's work
///
/// The coordinator enforces the deadline around `execute`; an
/// implementation may also watch `cancellation` and stop early.
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    async fn execute(
        &self,
        task: &Task,
        agent: &AgentProfile,
        cancellation: CancellationToken,
    ) -> ExecutionReport;
}

/// Builds the profile handed to an executor for `agent`
pub fn profile_for(agent: &Agent) -> AgentProfile {
    let template = library::agent_system(agent.agent_type());
    let variables = HashMap::from([
        ("name".to_string(), agent.name().to_string()),
        ("capabilities".to_string(), agent.capabilities().join(", ")),
    ]);
    let system_prompt = format!("{}\n{}", template.system, template.render(&variables));
    AgentProfile::from_agent(agent, system_prompt)
}

/// Renders the execution brief for `task`
pub fn task_brief(task: &Task) -> String {
    let variables = HashMap::from([
        ("task_type".to_string(), task.task_type().to_string()),
        ("priority".to_string(), task.priority().to_string()),
        ("description".to_string(), task.description().to_string()),
    ]);
    library::task_execution().render(&variables)
}

/// Executor that completes every task after an optional delay
///
/// Stands in for the language-model call so the engine can run end to
/// end without external services.
#[derive(Debug, Clone, Default)]
pub struct SimulatedExecutor {
    latency: Duration,
}

impl SimulatedExecutor {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl TaskExecutor for SimulatedExecutor {
    async fn execute(
        &self,
        task: &Task,
        agent: &AgentProfile,
        cancellation: CancellationToken,
    ) -> ExecutionReport {
        tokio::select! {
            _ = cancellation.cancelled() => {
                return ExecutionReport::failure("Task cancelled before completion");
            }
            _ = tokio::time::sleep(self.latency) => {}
        }

        ExecutionReport::success(json!({
            "agent": agent.name,
            "taskType": task.task_type(),
            "brief": task_brief(task),
            "summary": format!("{} completed: {}", agent.name, task.description()),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::agent::AgentType;
    use crate::domain::task::{TaskPriority, TaskType};
    use crate::orchestration::types::ExecutionOutcome;

    fn agent() -> Agent {
        Agent::new(
            "architect",
            "Ada",
            AgentType::Architect,
            ["system_design", "architecture_review"],
        )
    }

    #[test]
    fn profile_carries_rendered_system_prompt() {
        let profile = profile_for(&agent());

        assert_eq!(profile.id, "architect");
        assert!(profile.system_prompt.contains("Software Architect"));
        assert!(profile.system_prompt.contains("You are Ada"));
        assert!(profile.system_prompt.contains("system_design, architecture_review"));
    }

    #[test]
    fn brief_includes_task_details() {
        let task = Task::new(TaskType::DesignArchitecture, "Plan the services")
            .unwrap()
            .with_priority(TaskPriority::High);

        let brief = task_brief(&task);

        assert!(brief.contains("design_architecture"));
        assert!(brief.contains("high"));
        assert!(brief.contains("Plan the services"));
    }

    #[tokio::test]
    async fn simulated_executor_succeeds() {
        let task = Task::new(TaskType::DesignArchitecture, "Plan the services").unwrap();
        let executor = SimulatedExecutor::default();

        let report = executor
            .execute(&task, &profile_for(&agent()), CancellationToken::new())
            .await;

        assert_eq!(report.outcome, ExecutionOutcome::Success);
        assert_eq!(report.result["agent"], "Ada");
    }

    #[tokio::test]
    async fn simulated_executor_observes_cancellation() {
        let task = Task::new(TaskType::DesignArchitecture, "Plan the services").unwrap();
        let executor = SimulatedExecutor::new(Duration::from_secs(30));
        let token = CancellationToken::new();
        token.cancel();

        let report = executor.execute(&task, &profile_for(&agent()), token).await;

        assert_eq!(report.outcome, ExecutionOutcome::Failure);
    }
}
