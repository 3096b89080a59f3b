//! RP2350 platform implementation for Raspberry Pi Pico 2 W
//!
//! Concrete PWM outputs for ESCs and servos using the `rp235x-hal` crate.
//!
//! # Feature Gate
//!
//! This module is only available when the `pico2_w` feature is enabled:
//!
//! ```toml
//! [dependencies]
//! aero_mix = { version = "0.1", features = ["pico2_w"] }
//! ```

mod pwm;

pub use pwm::{PwmOutput, Rp2350Pwm, SYS_CLOCK_HZ};
