//! Platform abstraction traits
//!
//! This module defines the traits that platform implementations must provide.

pub mod pwm;

pub use pwm::{frame_period_us, pulse_to_duty_cycle, PwmConfig, PwmInterface, SERVO_FRAME_HZ};
