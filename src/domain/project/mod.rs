// Project domain module
// Contains the project aggregate root and its status value object

#![allow(clippy::module_inception)]

pub mod project;
pub mod value_objects;

pub use project::Project;
pub use value_objects::ProjectStatus;
