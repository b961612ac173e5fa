use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::AppState;
use crate::domain::project::Project;
use crate::domain::task::Task;
use crate::orchestration::aggregator::ProjectSummary;
use crate::orchestration::{SystemStatus, TaskResult};

/// Request body for starting a project
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartProjectRequest {
    #[serde(default)]
    pub user_request: Option<String>,
}

/// Response from project creation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartProjectResponse {
    pub success: bool,
    pub project_id: Uuid,
    pub project: Project,
    pub tasks: Vec<Task>,
    pub message: String,
}

/// Every project plus the system overview
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectListResponse {
    pub success: bool,
    pub projects: Vec<Project>,
    pub system_status: SystemStatus,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetailResponse {
    pub success: bool,
    pub project: Project,
    pub tasks: Vec<Task>,
    pub summary: ProjectSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunProjectResponse {
    pub success: bool,
    pub results: Vec<TaskResult>,
    pub summary: ProjectSummary,
}

/// Decompose a request into a new project
///
/// POST /api/multi-agent/start-project
pub async fn start_project(
    State(coordinator): State<AppState>,
    Json(req): Json<StartProjectRequest>,
) -> Result<(StatusCode, Json<StartProjectResponse>), ApiError> {
    let user_request = req.user_request.unwrap_or_default();
    let project = coordinator.start_project(&user_request).await?;
    let tasks = coordinator.project_tasks(project.id()).await?;

    let message = format!(
        "Project \"{}\" planned with {} tasks",
        project.name(),
        tasks.len()
    );

    Ok((
        StatusCode::CREATED,
        Json(StartProjectResponse {
            success: true,
            project_id: project.id(),
            project,
            tasks,
            message,
        }),
    ))
}

/// List projects with system status
///
/// GET /api/multi-agent/start-project
pub async fn list_projects(State(coordinator): State<AppState>) -> Json<ProjectListResponse> {
    let projects = coordinator.get_all_projects().await;
    let system_status = coordinator.get_system_status().await;

    Json(ProjectListResponse {
        success: true,
        projects,
        system_status,
        message: "Multi-agent system status retrieved".to_string(),
    })
}

/// Get a project by ID
///
/// GET /api/multi-agent/projects/:id
pub async fn get_project(
    State(coordinator): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProjectDetailResponse>, ApiError> {
    let project = coordinator.get_project(id).await?;
    let tasks = coordinator.project_tasks(id).await?;
    let summary = coordinator.project_summary(id).await?;

    Ok(Json(ProjectDetailResponse {
        success: true,
        project,
        tasks,
        summary,
    }))
}

/// Execute runnable tasks until the project stops making progress
///
/// POST /api/multi-agent/projects/:id/run
pub async fn run_project(
    State(coordinator): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RunProjectResponse>, ApiError> {
    let results = coordinator.run_project(id).await?;
    let summary = coordinator.project_summary(id).await?;

    Ok(Json(RunProjectResponse {
        success: summary.task_counts.failed == 0,
        results,
        summary,
    }))
}
