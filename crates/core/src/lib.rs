//! aero_mix_core - Pure no_std mixing and output logic for aero_mix
//!
//! This crate contains the platform-agnostic half of the actuation path:
//! airframe mixing, output scaling, the safety gate and the parameter
//! definitions that configure them. Everything can be tested on host without
//! any feature flags or embassy dependencies.
//!
//! # Design Principles
//!
//! - **Zero cfg**: No `#[cfg(feature = ...)]` directives allowed
//! - **Pure no_std**: No std library dependencies
//! - **No logging**: Errors and faults are returned, the caller logs them
//!
//! # Modules
//!
//! - [`rc`]: Pilot demand, stabilization corrections, throttle calibration
//! - [`arming`]: Arming state and safety flags read by the output gate
//! - [`mixer`]: Airframe catalog, mix engine, fixed-wing/flying-wing/gimbal mixers
//! - [`output`]: Channel layout, pulse scaling, gated output buffer
//! - [`pipeline`]: One full actuation cycle
//! - [`parameters`]: Parameter store and parameter groups

#![no_std]

pub mod arming;
pub mod mixer;
pub mod output;
pub mod parameters;
pub mod pipeline;
pub mod rc;

pub use pipeline::{ActuationPipeline, CycleReport};
