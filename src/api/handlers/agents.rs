use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;
use crate::api::AppState;
use crate::domain::agent::Agent;
use crate::domain::communication::Communication;
use crate::orchestration::SystemStatus;

/// Request body for agent actions
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentActionRequest {
    pub action: String,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub target_agent_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentListResponse {
    pub success: bool,
    pub agents: Vec<Agent>,
    pub system_status: SystemStatus,
    pub message: String,
}

/// Response to an agent action; which optional field is set depends on the action
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentActionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub communication: Option<Communication>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub communications: Option<Vec<Communication>>,
    pub message: String,
}

/// List agents with system status
///
/// GET /api/multi-agent/agents
pub async fn list_agents(State(coordinator): State<AppState>) -> Json<AgentListResponse> {
    let agents = coordinator.get_all_agents().await;
    let system_status = coordinator.get_system_status().await;

    Json(AgentListResponse {
        success: true,
        agents,
        system_status,
        message: "Agent status retrieved successfully".to_string(),
    })
}

/// Send a message or read communication history
///
/// POST /api/multi-agent/agents
pub async fn agent_action(
    State(coordinator): State<AppState>,
    Json(req): Json<AgentActionRequest>,
) -> Result<Json<AgentActionResponse>, ApiError> {
    match req.action.as_str() {
        "send_message" => {
            let (Some(from), Some(to), Some(message)) =
                (req.agent_id, req.target_agent_id, req.message)
            else {
                return Err(ApiError::bad_request(
                    "agentId, targetAgentId, and message are required for send_message action",
                ));
            };

            let communication = coordinator.send_message(&from, &to, &message).await?;

            Ok(Json(AgentActionResponse {
                success: true,
                communication: Some(communication),
                communications: None,
                message: "Message sent successfully".to_string(),
            }))
        }
        "get_communications" => {
            let communications = coordinator
                .communication_history(req.agent_id.as_deref())
                .await;

            Ok(Json(AgentActionResponse {
                success: true,
                communication: None,
                communications: Some(communications),
                message: "Communication history retrieved".to_string(),
            }))
        }
        other => Err(ApiError::bad_request(format!("Unknown action: {}", other))),
    }
}
