// API layer module (adapter over the coordinator)
// Marshals JSON requests into coordinator calls and back; no logic of its own.

pub mod errors;
pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::orchestration::Coordinator;
use handlers::{agents, health, projects, tasks};

/// Shared handler state: the process-wide coordinator
pub type AppState = Arc<Coordinator>;

/// Builds every route of the multi-agent API
pub fn router(coordinator: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/api/multi-agent/start-project",
            post(projects::start_project).get(projects::list_projects),
        )
        .route("/api/multi-agent/projects/:id", get(projects::get_project))
        .route("/api/multi-agent/projects/:id/run", post(projects::run_project))
        .route(
            "/api/multi-agent/agents",
            get(agents::list_agents).post(agents::agent_action),
        )
        .route("/api/multi-agent/execute-task", post(tasks::execute_task))
        .route("/api/multi-agent/tasks/:id/cancel", post(tasks::cancel_task))
        .with_state(coordinator)
}
