// Domain layer module exports
// Entities and value objects of the development-team orchestrator.
// Domain is independent of orchestration and transport concerns.

pub mod agent;
pub mod communication;
pub mod project;
pub mod task;
