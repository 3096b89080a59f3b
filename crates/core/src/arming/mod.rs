//! Arming state and output safety flags
//!
//! The arming state machine itself lives outside this crate. The mixer and
//! output gate only read [`ArmingState`] and [`SafetyFlags`] each cycle.

pub mod state;

pub use state::{ArmingState, SafetyFlags, DEFAULT_IDLE_THRESHOLD};
