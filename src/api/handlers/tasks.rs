use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::AppState;
use crate::domain::task::{TaskPriority, TaskType};
use crate::orchestration::{Cancellation, TaskRequest, TaskResult};

/// Request body for task execution
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteTaskRequest {
    #[serde(default)]
    pub task_description: Option<String>,
    #[serde(default)]
    pub task_type: Option<TaskType>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default)]
    pub project_id: Option<Uuid>,
    #[serde(default)]
    pub dependencies: Vec<Uuid>,
    /// Runs an existing task instead of creating one
    #[serde(default)]
    pub task_id: Option<Uuid>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Agent that must run the task
    #[serde(default)]
    pub assigned_agent: Option<String>,
}

impl From<ExecuteTaskRequest> for TaskRequest {
    fn from(req: ExecuteTaskRequest) -> Self {
        Self {
            id: req.task_id,
            description: req.task_description.unwrap_or_default(),
            task_type: req.task_type,
            priority: req.priority,
            project_id: req.project_id,
            dependencies: req.dependencies,
            timeout_ms: req.timeout_ms,
            assigned_agent: req.assigned_agent,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteTaskResponse {
    pub success: bool,
    #[serde(flatten)]
    pub result: TaskResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelTaskResponse {
    pub success: bool,
    pub task_id: Uuid,
    pub cancellation: Cancellation,
}

/// Run a task on the best eligible agent
///
/// POST /api/multi-agent/execute-task
pub async fn execute_task(
    State(coordinator): State<AppState>,
    Json(req): Json<ExecuteTaskRequest>,
) -> Result<Json<ExecuteTaskResponse>, ApiError> {
    let has_description = req
        .task_description
        .as_deref()
        .is_some_and(|d| !d.trim().is_empty());
    if req.task_id.is_none() && !has_description {
        return Err(ApiError::bad_request(
            "Task description is required and must be a string",
        ));
    }

    let result = coordinator.execute_task(req.into()).await?;

    Ok(Json(ExecuteTaskResponse {
        success: result.succeeded(),
        result,
    }))
}

/// Withdraw or signal a task
///
/// POST /api/multi-agent/tasks/:id/cancel
pub async fn cancel_task(
    State(coordinator): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CancelTaskResponse>, ApiError> {
    let cancellation = coordinator.cancel_task(id).await?;

    Ok(Json(CancelTaskResponse {
        success: true,
        task_id: id,
        cancellation,
    }))
}
