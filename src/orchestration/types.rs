use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::agent::{Agent, AgentType};
use crate::domain::task::{TaskPriority, TaskStatus, TaskType};

/// What the execution capability is told about the agent doing the work
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentProfile {
    pub id: String,
    pub name: String,
    pub agent_type: AgentType,
    pub capabilities: Vec<String>,
    pub system_prompt: String,
}

impl AgentProfile {
    pub fn from_agent(agent: &Agent, system_prompt: String) -> Self {
        Self {
            id: agent.id().to_string(),
            name: agent.name().to_string(),
            agent_type: agent.agent_type(),
            capabilities: agent.capabilities().to_vec(),
            system_prompt,
        }
    }
}

/// How an execution attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionOutcome {
    Success,
    Failure,
    Timeout,
}

/// Result returned by a [`TaskExecutor`](super::executor::TaskExecutor)
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionReport {
    pub outcome: ExecutionOutcome,
    pub result: serde_json::Value,
}

impl ExecutionReport {
    pub fn success(result: serde_json::Value) -> Self {
        Self {
            outcome: ExecutionOutcome::Success,
            result,
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            outcome: ExecutionOutcome::Failure,
            result: serde_json::Value::String(reason.into()),
        }
    }

    pub fn timeout() -> Self {
        Self {
            outcome: ExecutionOutcome::Timeout,
            result: serde_json::Value::Null,
        }
    }
}

/// Request to run a task, new or already in a project
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    /// Runs the existing task with this id, or creates one with it
    #[serde(default)]
    pub id: Option<Uuid>,
    pub description: String,
    #[serde(default)]
    pub task_type: Option<TaskType>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default)]
    pub project_id: Option<Uuid>,
    #[serde(default)]
    pub dependencies: Vec<Uuid>,
    /// Overrides the configured execution deadline
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Pins execution to this agent instead of the best match
    #[serde(default)]
    pub assigned_agent: Option<String>,
}

impl TaskRequest {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, task_type: TaskType) -> Self {
        self.task_type = Some(task_type);
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn in_project(mut self, project_id: Uuid) -> Self {
        self.project_id = Some(project_id);
        self
    }

    pub fn depending_on(mut self, dependencies: impl IntoIterator<Item = Uuid>) -> Self {
        self.dependencies = dependencies.into_iter().collect();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn assigned_to(mut self, agent_id: impl Into<String>) -> Self {
        self.assigned_agent = Some(agent_id.into());
        self
    }
}

/// Outcome of one `execute_task` call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResult {
    pub task_id: Uuid,
    pub project_id: Uuid,
    pub agent_id: String,
    pub outcome: ExecutionOutcome,
    pub status: TaskStatus,
    pub result: Option<serde_json::Value>,
    pub error: Option<String>,
    pub message: String,
}

impl TaskResult {
    pub fn succeeded(&self) -> bool {
        self.outcome == ExecutionOutcome::Success
    }
}

/// A task proposed by a decomposer before it has an id
///
/// Dependencies point at earlier drafts in the same plan by index.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub task_type: TaskType,
    pub description: String,
    pub priority: TaskPriority,
    pub depends_on: Vec<usize>,
}

impl TaskDraft {
    pub fn new(task_type: TaskType, description: impl Into<String>) -> Self {
        Self {
            task_type,
            description: description.into(),
            priority: TaskPriority::default(),
            depends_on: Vec::new(),
        }
    }

    pub fn priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn after(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.depends_on = indices.into_iter().collect();
        self
    }
}

/// What a cancellation request did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cancellation {
    /// Pending task removed from scheduling
    Withdrawn,
    /// In-flight task signalled; the executor may ignore it
    Requested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemHealth {
    Healthy,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    pub active_projects: usize,
    pub total_agents: usize,
    pub active_agents: usize,
    pub recent_communications: usize,
    pub system_health: SystemHealth,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_request_deserializes_with_defaults() {
        let request: TaskRequest =
            serde_json::from_str(r#"{"description": "Write docs"}"#).unwrap();

        assert_eq!(request.description, "Write docs");
        assert!(request.task_type.is_none());
        assert!(request.dependencies.is_empty());
    }

    #[test]
    fn task_request_reads_camel_case() {
        let request: TaskRequest = serde_json::from_str(
            r#"{"description": "Ship", "taskType": "deploy", "priority": "critical", "timeoutMs": 50}"#,
        )
        .unwrap();

        assert_eq!(request.task_type, Some(TaskType::Deploy));
        assert_eq!(request.priority, Some(TaskPriority::Critical));
        assert_eq!(request.timeout_ms, Some(50));
    }

    #[test]
    fn system_status_serializes_camel_case() {
        let status = SystemStatus {
            active_projects: 1,
            total_agents: 7,
            active_agents: 2,
            recent_communications: 3,
            system_health: SystemHealth::Healthy,
        };
        let json = serde_json::to_value(status).unwrap();

        assert_eq!(json["activeProjects"], 1);
        assert_eq!(json["systemHealth"], "healthy");
    }
}
