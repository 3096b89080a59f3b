#![cfg_attr(not(test), no_std)]

//! aero_mix - Actuation mixing and output stage for Raspberry Pi Pico 2 W
//!
//! This library wires the platform-agnostic mixing core (`aero_mix_core`)
//! to parameters, logging, Embassy tasks and PWM hardware.

// Platform abstraction layer (PWM outputs)
pub mod platform;

// Core systems (configuration, logging, control and output tasks)
pub mod core;

// Output libraries (SRV_Channel equivalent)
pub mod libraries;

pub use aero_mix_core as mixing;
