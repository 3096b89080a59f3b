//! Arming Parameter Definitions
//!
//! # Parameters
//!
//! - `ARM_IDLE` - Monopolar throttle (μs above the zero offset) below which
//!   armed motors stay at the minimum pulse

use super::error::ParameterError;
use super::storage::{ParamFlags, ParamValue, ParameterStore};
use crate::arming::{ArmingState, DEFAULT_IDLE_THRESHOLD};

/// Arming parameters loaded from parameter store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmingParams {
    pub idle_threshold: i16,
}

impl ArmingParams {
    /// Register arming parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        store.register(
            "ARM_IDLE",
            ParamValue::Int(DEFAULT_IDLE_THRESHOLD as i32),
            ParamFlags::empty(),
        )?;
        Ok(())
    }

    /// Load arming parameters from parameter store
    ///
    /// Negative thresholds are treated as 0.
    pub fn from_store(store: &ParameterStore) -> Self {
        let threshold = store.int_or("ARM_IDLE", DEFAULT_IDLE_THRESHOLD as i32);
        Self {
            idle_threshold: threshold.clamp(0, i16::MAX as i32) as i16,
        }
    }

    /// Arming state for the current armed flag
    pub fn state(&self, armed: bool) -> ArmingState {
        ArmingState {
            armed,
            idle_threshold: self.idle_threshold,
        }
    }
}
