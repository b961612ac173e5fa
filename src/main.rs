use std::sync::Arc;

use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use devteam_orchestrator::api;
use devteam_orchestrator::config::AppConfig;
use devteam_orchestrator::orchestration::Coordinator;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration (.env plus environment)
    let config = AppConfig::from_env();

    let coordinator = Coordinator::new(config.coordinator).expect("Failed to build coordinator");
    let status = coordinator.get_system_status().await;
    tracing::info!(
        agents = status.total_agents,
        health = ?status.system_health,
        "Coordinator ready"
    );

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = api::router(Arc::new(coordinator))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    tracing::info!("Server listening on {}", config.addr);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app)
        .await
        .expect("Server failed");
}
