//! Course progress and job matching engine for the SkillBridge marketplace.
//!
//! The computational core lives in [`workflows::learning::progress`] and
//! [`workflows::jobs::matching`]; everything else wires those pure functions to
//! storage traits, HTTP routers and configuration.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod validation;
pub mod workflows;
