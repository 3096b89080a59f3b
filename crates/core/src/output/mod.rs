//! Output stage
//!
//! - [`channel`]: physical channel layout and validation
//! - [`scaler`]: internal units to pulse widths, throttle-floor override
//! - [`buffer`]: gated handoff to the pulse generator
//! - [`error`]: configuration load errors

pub mod buffer;
pub mod channel;
pub mod error;
pub mod scaler;

pub use buffer::{OutputBuffer, OutputSnapshot};
pub use channel::{ChannelConfig, ChannelMap, ChannelRole, MAX_OUTPUTS};
pub use error::ConfigError;
pub use scaler::{
    GateDecision, OutputFrame, OutputScaler, ThrottleSample, MOTOR_MIN_PULSE_US, PULSE_MAX_US,
    PULSE_MIN_US,
};
