// Task domain module
// Contains the task entity and its kind/priority/status value objects

#![allow(clippy::module_inception)]

pub mod task;
pub mod value_objects;

pub use task::Task;
pub use value_objects::{TaskOutcome, TaskPriority, TaskStatus, TaskType};
