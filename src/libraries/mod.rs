//! Common libraries
//!
//! Vehicle-agnostic libraries following ArduPilot's library architecture.
//!
//! ## Libraries
//!
//! - `srv_channel`: Servo/motor output processing (SRV_Channel equivalent)

pub mod srv_channel;

pub use srv_channel::ServoOutputs;
