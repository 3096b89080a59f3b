//! Pulse output interface
//!
//! ESCs and servos read the high time of a fixed-rate frame, so outputs are
//! driven in microseconds. The duty-cycle view remains for drivers that only
//! expose a fraction of the period; [`PwmInterface::set_pulse_us`] falls back
//! to it by default.

use crate::platform::{
    error::{PlatformError, PwmError},
    Result,
};

/// Standard servo/ESC frame rate (Hz)
pub const SERVO_FRAME_HZ: u32 = 50;

/// Output configuration
#[derive(Debug, Clone, Copy)]
pub struct PwmConfig {
    /// Frame rate in Hz
    pub frequency: u32,
    /// Pulse driven until the first frame is applied (μs); 0 keeps the line low
    pub pulse_us: u16,
}

impl Default for PwmConfig {
    fn default() -> Self {
        Self {
            frequency: SERVO_FRAME_HZ,
            pulse_us: 0,
        }
    }
}

/// Frame period (μs) at `frequency`, 0 for a zero rate
pub fn frame_period_us(frequency: u32) -> u32 {
    if frequency == 0 {
        return 0;
    }
    1_000_000 / frequency
}

/// Convert a pulse width to a duty cycle
///
/// For 50 Hz frames (20 ms period):
/// - 1000 μs = 5.0% duty cycle
/// - 1500 μs = 7.5% duty cycle
/// - 2000 μs = 10.0% duty cycle
///
/// A zero frequency yields 0.0; pulses longer than the period saturate at 1.0.
pub fn pulse_to_duty_cycle(pulse_us: u16, frequency: u32) -> f32 {
    if frequency == 0 {
        return 0.0;
    }
    let period_us = 1_000_000.0 / frequency as f32;
    (pulse_us as f32 / period_us).min(1.0)
}

/// One ESC or servo output
///
/// # Safety Invariants
///
/// - Only one owner per output pin
/// - Pulses are applied exactly as given; arming and throttle-floor overrides
///   happen before a frame reaches the output
pub trait PwmInterface {
    /// Drive `pulse_us` of high time in every frame
    ///
    /// The default converts to a duty cycle of the current frame rate.
    ///
    /// # Errors
    ///
    /// - `PwmError::InvalidFrequency` if no frame rate is set
    /// - `PwmError::PulseTooLong` if the pulse does not fit in one frame
    fn set_pulse_us(&mut self, pulse_us: u16) -> Result<()> {
        let period_us = frame_period_us(self.frequency());
        if period_us == 0 {
            return Err(PlatformError::Pwm(PwmError::InvalidFrequency));
        }
        if pulse_us as u32 > period_us {
            return Err(PlatformError::Pwm(PwmError::PulseTooLong));
        }
        self.set_duty_cycle(pulse_to_duty_cycle(pulse_us, self.frequency()))
    }

    /// High time currently driven (μs), rounded to the nearest microsecond
    fn pulse_us(&self) -> u16 {
        let period_us = frame_period_us(self.frequency());
        (self.duty_cycle() * period_us as f32 + 0.5) as u16
    }

    /// Set the duty cycle directly
    ///
    /// # Errors
    ///
    /// Returns `PwmError::InvalidDutyCycle` outside `0.0..=1.0`.
    fn set_duty_cycle(&mut self, duty_cycle: f32) -> Result<()>;

    /// Current duty cycle (0.0 = 0%, 1.0 = 100%)
    fn duty_cycle(&self) -> f32;

    /// Change the frame rate
    ///
    /// # Errors
    ///
    /// Returns `PwmError::InvalidFrequency` if the rate cannot be produced.
    fn set_frequency(&mut self, frequency: u32) -> Result<()>;

    /// Frame rate in Hz
    fn frequency(&self) -> u32;

    fn enable(&mut self);

    fn disable(&mut self);

    fn is_enabled(&self) -> bool;
}
