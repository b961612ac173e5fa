use super::value_objects::{AgentStatus, AgentType};
use serde::Serialize;
use uuid::Uuid;

/// A member of the fixed development-team roster
///
/// # Invariants
/// - Status is `Working` if and only if a current task is held
/// - At most one current task at a time
/// - Completed task ids are kept in completion order
///
/// # Example
/// ```
/// use devteam_orchestrator::domain::agent::{Agent, AgentStatus, AgentType};
///
/// let agent = Agent::new("architect", "Ada", AgentType::Architect, ["system_design"]);
/// assert_eq!(agent.status(), AgentStatus::Idle);
/// assert!(agent.has_capability("system_design"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    id: String,
    name: String,
    #[serde(rename = "type")]
    agent_type: AgentType,
    capabilities: Vec<String>,
    status: AgentStatus,
    current_task: Option<Uuid>,
    completed_tasks: Vec<Uuid>,
}

impl Agent {
    /// Creates an idle agent with no task history
    ///
    /// Duplicate capabilities are collapsed, first occurrence wins.
    pub fn new<I, S>(
        id: impl Into<String>,
        name: impl Into<String>,
        agent_type: AgentType,
        capabilities: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for capability in capabilities {
            let capability = capability.into();
            if !unique.contains(&capability) {
                unique.push(capability);
            }
        }

        Self {
            id: id.into(),
            name: name.into(),
            agent_type,
            capabilities: unique,
            status: AgentStatus::Idle,
            current_task: None,
            completed_tasks: Vec::new(),
        }
    }

    /// Moves the agent to `next`, holding `task` when working
    ///
    /// # Business Rules
    /// - `Working` requires a task
    /// - Every other status must not carry a task and clears the current one
    /// - A working agent cannot be moved onto a second task
    pub fn transition(&mut self, next: AgentStatus, task: Option<Uuid>) -> Result<(), String> {
        match (next.requires_task(), task) {
            (true, None) => {
                return Err(format!("Agent {} cannot be {} without a task", self.id, next));
            }
            (false, Some(task_id)) => {
                return Err(format!(
                    "Agent {} cannot hold task {} while {}",
                    self.id, task_id, next
                ));
            }
            _ => {}
        }

        if self.status == AgentStatus::Working && next == AgentStatus::Working {
            return Err(format!(
                "Agent {} is already working on {:?}",
                self.id, self.current_task
            ));
        }

        self.status = next;
        self.current_task = task;
        Ok(())
    }

    /// Appends a finished task to the history
    pub fn record_completion(&mut self, task_id: Uuid) {
        self.completed_tasks.push(task_id);
    }

    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.iter().any(|c| c == capability)
    }

    /// Number of `required` capabilities this agent has
    pub fn capability_overlap(&self, required: &[&str]) -> usize {
        required.iter().filter(|r| self.has_capability(r)).count()
    }

    // ===== Getters =====

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn agent_type(&self) -> AgentType {
        self.agent_type
    }

    pub fn capabilities(&self) -> &[String] {
        &self.capabilities
    }

    pub fn status(&self) -> AgentStatus {
        self.status
    }

    pub fn current_task(&self) -> Option<Uuid> {
        self.current_task
    }

    pub fn completed_tasks(&self) -> &[Uuid] {
        &self.completed_tasks
    }
}
