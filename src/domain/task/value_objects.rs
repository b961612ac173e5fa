use serde::{Deserialize, Serialize};

/// Kind of work a task represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    #[default]
    CoordinateProject,
    AnalyzeRequirements,
    DesignArchitecture,
    DesignUi,
    ImplementFrontend,
    ImplementBackend,
    RunTests,
    Deploy,
}

impl TaskType {
    /// Capabilities an agent needs to pick up this kind of task
    ///
    /// An agent is eligible when it has at least one of them; more
    /// matches rank higher.
    pub fn required_capabilities(&self) -> &'static [&'static str] {
        match self {
            TaskType::CoordinateProject => &["project_coordination", "stakeholder_communication"],
            TaskType::AnalyzeRequirements => &["requirements_analysis", "user_stories"],
            TaskType::DesignArchitecture => &["system_design", "architecture_review"],
            TaskType::DesignUi => &["ui_design", "prototyping"],
            TaskType::ImplementFrontend => &["frontend_development", "ui_implementation"],
            TaskType::ImplementBackend => &["backend_development", "api_design"],
            TaskType::RunTests => &["testing", "test_automation"],
            TaskType::Deploy => &["deployment", "ci_cd"],
        }
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskType::CoordinateProject => write!(f, "coordinate_project"),
            TaskType::AnalyzeRequirements => write!(f, "analyze_requirements"),
            TaskType::DesignArchitecture => write!(f, "design_architecture"),
            TaskType::DesignUi => write!(f, "design_ui"),
            TaskType::ImplementFrontend => write!(f, "implement_frontend"),
            TaskType::ImplementBackend => write!(f, "implement_backend"),
            TaskType::RunTests => write!(f, "run_tests"),
            TaskType::Deploy => write!(f, "deploy"),
        }
    }
}

/// Scheduling priority, highest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl TaskPriority {
    /// Scheduling rank; larger runs first
    pub fn rank(&self) -> u8 {
        match self {
            TaskPriority::Low => 0,
            TaskPriority::Medium => 1,
            TaskPriority::High => 2,
            TaskPriority::Critical => 3,
        }
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskPriority::Low => write!(f, "low"),
            TaskPriority::Medium => write!(f, "medium"),
            TaskPriority::High => write!(f, "high"),
            TaskPriority::Critical => write!(f, "critical"),
        }
    }
}

/// Lifecycle status of a task
///
/// # Status Transitions
/// ```text
/// Pending -> InProgress -> Completed
///                 └------> Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl TaskStatus {
    /// Checks if a transition from current status to next status is valid
    ///
    /// # Example
    /// ```
    /// use devteam_orchestrator::domain::task::TaskStatus;
    ///
    /// assert!(TaskStatus::Pending.can_transition_to(TaskStatus::InProgress));
    /// assert!(!TaskStatus::Pending.can_transition_to(TaskStatus::Completed));
    /// ```
    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        use TaskStatus::*;
        matches!(
            (self, next),
            (Pending, InProgress) | (InProgress, Completed) | (InProgress, Failed)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::InProgress => write!(f, "in_progress"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Terminal outcome recorded when a task finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskOutcome {
    Completed,
    Failed,
}

impl From<TaskOutcome> for TaskStatus {
    fn from(outcome: TaskOutcome) -> Self {
        match outcome {
            TaskOutcome::Completed => TaskStatus::Completed,
            TaskOutcome::Failed => TaskStatus::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_transition_pending_to_in_progress() {
        assert!(TaskStatus::Pending.can_transition_to(TaskStatus::InProgress));
    }

    #[test]
    fn valid_transitions_in_progress_to_terminal() {
        assert!(TaskStatus::InProgress.can_transition_to(TaskStatus::Completed));
        assert!(TaskStatus::InProgress.can_transition_to(TaskStatus::Failed));
    }

    #[test]
    fn invalid_transition_pending_to_terminal() {
        assert!(!TaskStatus::Pending.can_transition_to(TaskStatus::Completed));
        assert!(!TaskStatus::Pending.can_transition_to(TaskStatus::Failed));
    }

    #[test]
    fn terminal_states_are_final() {
        for terminal in [TaskStatus::Completed, TaskStatus::Failed] {
            assert!(terminal.is_terminal());
            for next in [
                TaskStatus::Pending,
                TaskStatus::InProgress,
                TaskStatus::Completed,
                TaskStatus::Failed,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn invalid_transition_in_progress_back_to_pending() {
        assert!(!TaskStatus::InProgress.can_transition_to(TaskStatus::Pending));
    }

    #[test]
    fn priority_rank_orders_critical_first() {
        assert!(TaskPriority::Critical.rank() > TaskPriority::High.rank());
        assert!(TaskPriority::High.rank() > TaskPriority::Medium.rank());
        assert!(TaskPriority::Medium.rank() > TaskPriority::Low.rank());
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
    }

    #[test]
    fn every_task_type_requires_capabilities() {
        for task_type in [
            TaskType::CoordinateProject,
            TaskType::AnalyzeRequirements,
            TaskType::DesignArchitecture,
            TaskType::DesignUi,
            TaskType::ImplementFrontend,
            TaskType::ImplementBackend,
            TaskType::RunTests,
            TaskType::Deploy,
        ] {
            assert!(!task_type.required_capabilities().is_empty());
        }
    }

    #[test]
    fn status_display() {
        assert_eq!(TaskStatus::Pending.to_string(), "pending");
        assert_eq!(TaskStatus::InProgress.to_string(), "in_progress");
        assert_eq!(TaskStatus::Completed.to_string(), "completed");
        assert_eq!(TaskStatus::Failed.to_string(), "failed");
    }
}
