pub mod agents;
pub mod health;
pub mod projects;
pub mod tasks;
