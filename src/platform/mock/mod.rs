//! Mock platform implementation for testing
//!
//! Available during test builds and when the `mock` feature is enabled, so
//! host-side integration tests can drive the output stage without hardware.
//!
//! # Example
//!
//! ```ignore
//! use aero_mix::platform::mock::MockPwm;
//! use aero_mix::platform::traits::{PwmConfig, PwmInterface};
//!
//! let mut pwm = MockPwm::new(PwmConfig::default());
//! pwm.set_pulse_us(1500).unwrap();
//! assert_eq!(pwm.pulse_us(), 1500);
//! ```

#![cfg(any(test, feature = "mock"))]

mod pwm;

pub use pwm::MockPwm;
