//! Actuation scheduling
//!
//! The control task mixes and publishes one frame per control cycle; the
//! output task copies published frames onto the PWM hardware at the servo
//! frame rate. The two only meet at the [`OutputBuffer`] gate.
//!
//! [`OutputBuffer`]: aero_mix_core::output::OutputBuffer

pub mod tasks;

pub use tasks::{ControlLoop, CONTROL_RATE_HZ};
