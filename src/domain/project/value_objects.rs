use serde::{Deserialize, Serialize};

/// Aggregate status of a project, derived from its tasks
///
/// `Testing` exists for display compatibility; derivation never
/// produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Planning,
    InProgress,
    Testing,
    Completed,
    Failed,
}

impl ProjectStatus {
    /// Completed and failed projects no longer count as active
    pub fn is_active(&self) -> bool {
        !matches!(self, ProjectStatus::Completed | ProjectStatus::Failed)
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectStatus::Planning => write!(f, "planning"),
            ProjectStatus::InProgress => write!(f, "in_progress"),
            ProjectStatus::Testing => write!(f, "testing"),
            ProjectStatus::Completed => write!(f, "completed"),
            ProjectStatus::Failed => write!(f, "failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses_are_inactive() {
        assert!(!ProjectStatus::Completed.is_active());
        assert!(!ProjectStatus::Failed.is_active());
        assert!(ProjectStatus::Planning.is_active());
        assert!(ProjectStatus::InProgress.is_active());
        assert!(ProjectStatus::Testing.is_active());
    }

    #[test]
    fn status_display() {
        assert_eq!(ProjectStatus::Planning.to_string(), "planning");
        assert_eq!(ProjectStatus::InProgress.to_string(), "in_progress");
        assert_eq!(ProjectStatus::Completed.to_string(), "completed");
    }
}
