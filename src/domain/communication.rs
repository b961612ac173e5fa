use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Intent of a message exchanged between agents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CommunicationType {
    #[default]
    Request,
    Response,
    Question,
    Notification,
}

impl std::fmt::Display for CommunicationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommunicationType::Request => write!(f, "request"),
            CommunicationType::Response => write!(f, "response"),
            CommunicationType::Question => write!(f, "question"),
            CommunicationType::Notification => write!(f, "notification"),
        }
    }
}

/// An immutable entry in the communication log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Communication {
    pub id: Uuid,
    pub from_agent: String,
    pub to_agent: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: CommunicationType,
    pub related_task: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
}

impl Communication {
    /// Whether `agent_id` sent or received this message
    pub fn involves(&self, agent_id: &str) -> bool {
        self.from_agent == agent_id || self.to_agent == agent_id
    }
}
