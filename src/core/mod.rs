//! Core actuation infrastructure
//!
//! Logging, parameter-driven configuration, shared-state traits and the
//! control/output tasks that drive the mixing core.

pub mod config;
pub mod logging;
pub mod scheduler;
pub mod traits;
