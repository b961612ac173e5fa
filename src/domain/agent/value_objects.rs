use serde::{Deserialize, Serialize};

/// Role an agent plays on the development team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    ProductManager,
    Architect,
    Designer,
    FrontendDeveloper,
    BackendDeveloper,
    QaTester,
    Devops,
}

impl AgentType {
    /// Human readable role title
    pub fn title(&self) -> &'static str {
        match self {
            AgentType::ProductManager => "Product Manager",
            AgentType::Architect => "Software Architect",
            AgentType::Designer => "UI/UX Designer",
            AgentType::FrontendDeveloper => "Frontend Developer",
            AgentType::BackendDeveloper => "Backend Developer",
            AgentType::QaTester => "QA Tester",
            AgentType::Devops => "DevOps Engineer",
        }
    }
}

impl std::fmt::Display for AgentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentType::ProductManager => write!(f, "product_manager"),
            AgentType::Architect => write!(f, "architect"),
            AgentType::Designer => write!(f, "designer"),
            AgentType::FrontendDeveloper => write!(f, "frontend_developer"),
            AgentType::BackendDeveloper => write!(f, "backend_developer"),
            AgentType::QaTester => write!(f, "qa_tester"),
            AgentType::Devops => write!(f, "devops"),
        }
    }
}

/// Lifecycle status of an agent
///
/// # Status Transitions
/// Any status may follow any other. The only constraint is on the
/// current task: `Working` holds exactly one task, every other status
/// holds none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Idle,
    Thinking,
    Working,
    Waiting,
    Error,
}

impl AgentStatus {
    /// Whether this status must carry a current task
    pub fn requires_task(&self) -> bool {
        matches!(self, AgentStatus::Working)
    }

    /// Whether an agent in this status can take a new task
    pub fn is_available(&self) -> bool {
        matches!(self, AgentStatus::Idle | AgentStatus::Error)
    }
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentStatus::Idle => write!(f, "idle"),
            AgentStatus::Thinking => write!(f, "thinking"),
            AgentStatus::Working => write!(f, "working"),
            AgentStatus::Waiting => write!(f, "waiting"),
            AgentStatus::Error => write!(f, "error"),
        }
    }
}
