//! Dev-Team Orchestrator Library
//!
//! Coordinates a fixed roster of software-development agents working on
//! projects decomposed from natural-language requests: agent registry,
//! task dependency graph and scheduler, project aggregation, the
//! inter-agent communication bus, and an HTTP adapter over them.

pub mod api;
pub mod config;
pub mod domain;
pub mod orchestration;
