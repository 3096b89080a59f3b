//! Task implementations
//!
//! - Control loop (mix, scale, gate, publish)
//! - Pulse output (buffer to PWM)
//!
//! Each task follows the pattern of:
//! 1. Using Ticker for periodic execution
//! 2. Running a host-testable step function
//! 3. Logging errors and state changes, never every cycle

pub mod control;
pub mod output;

pub use control::{ControlLoop, CONTROL_RATE_HZ};
pub use output::OUTPUT_RATE_HZ;

#[cfg(feature = "pico2_w")]
pub use control::control_loop_task;
#[cfg(feature = "pico2_w")]
pub use output::output_task;
