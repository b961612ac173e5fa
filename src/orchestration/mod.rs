// Orchestration engine modules
//
// Agent registry, communication bus, task graph and scheduler, project
// aggregation, and the coordinator that drives them as one unit.

pub mod aggregator;
pub mod coordinator;
pub mod errors;
pub mod executor;
pub mod messages;
pub mod planner;
pub mod prompts;
pub mod registry;
pub mod roster;
pub mod scheduler;
pub mod state;
pub mod types;

// Re-export main types
pub use coordinator::Coordinator;
pub use errors::{OrchestratorError, OrchestratorResult};
pub use executor::{SimulatedExecutor, TaskExecutor};
pub use planner::{Decomposer, RoleBasedDecomposer};
pub use types::{
    AgentProfile, Cancellation, ExecutionOutcome, ExecutionReport, SystemHealth, SystemStatus,
    TaskDraft, TaskRequest, TaskResult,
};
