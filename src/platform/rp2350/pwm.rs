//! RP2350 PWM implementation
//!
//! One [`Rp2350Pwm`] drives one output pin. A slice carries two pins (A and B)
//! that share a frequency, so pair outputs with the same frame rate.

use crate::platform::{
    Result,
    error::{PlatformError, PwmError},
    traits::{frame_period_us, PwmConfig, PwmInterface},
};
use embedded_hal::pwm::SetDutyCycle;
use rp235x_hal::pwm::{FreeRunning, Slice, SliceId};

/// Default RP2350 system clock
pub const SYS_CLOCK_HZ: u32 = 150_000_000;

/// Counter resolution aimed for when picking the divider
const MAX_TOP: u32 = u16::MAX as u32;

/// Pin of the slice driven by an output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmOutput {
    A,
    B,
}

/// RP2350 PWM output
///
/// Pulses are converted straight to compare counts at the slice's tick rate
/// (`sys_clock / divider`), so a microsecond pulse never passes through a
/// floating-point duty cycle.
pub struct Rp2350Pwm<S: SliceId> {
    slice: Slice<S, FreeRunning>,
    output: PwmOutput,
    sys_clock_hz: u32,
    divider: u32,
    /// High time kept across frame-rate changes (μs)
    pulse_us: u16,
    frequency: u32,
    enabled: bool,
}

impl<S: SliceId> Rp2350Pwm<S> {
    /// Create a new RP2350 PWM instance
    ///
    /// # Arguments
    ///
    /// * `slice` - The HAL PWM slice
    /// * `output` - Which pin of the slice this instance drives
    /// * `sys_clock_hz` - System clock feeding the PWM block
    /// * `config` - PWM configuration
    ///
    /// # Errors
    ///
    /// Returns a PWM error if the frequency or initial pulse is invalid.
    pub fn new(
        slice: Slice<S, FreeRunning>,
        output: PwmOutput,
        sys_clock_hz: u32,
        config: PwmConfig,
    ) -> Result<Self> {
        let mut pwm = Self {
            slice,
            output,
            sys_clock_hz,
            divider: 1,
            pulse_us: 0,
            frequency: config.frequency,
            enabled: false,
        };

        pwm.set_frequency(config.frequency)?;
        pwm.set_pulse_us(config.pulse_us)?;
        Ok(pwm)
    }

    /// Counter ticks in `pulse_us`
    fn pulse_to_compare(&self, pulse_us: u16) -> u16 {
        let ticks_per_s = (self.sys_clock_hz / self.divider) as u64;
        (pulse_us as u64 * ticks_per_s / 1_000_000).min(u16::MAX as u64) as u16
    }

    fn period_counts(&self) -> u32 {
        self.slice.get_top() as u32 + 1
    }

    fn write_compare(&mut self, compare: u16) -> Result<()> {
        let written = match self.output {
            PwmOutput::A => self.slice.channel_a.set_duty_cycle(compare),
            PwmOutput::B => self.slice.channel_b.set_duty_cycle(compare),
        };
        written.map_err(|_| PlatformError::Pwm(PwmError::ChannelUnavailable))
    }
}

impl<S: SliceId> PwmInterface for Rp2350Pwm<S> {
    fn set_pulse_us(&mut self, pulse_us: u16) -> Result<()> {
        if pulse_us as u32 > frame_period_us(self.frequency) {
            return Err(PlatformError::Pwm(PwmError::PulseTooLong));
        }
        let compare = self.pulse_to_compare(pulse_us);
        self.write_compare(compare)?;
        self.pulse_us = pulse_us;
        Ok(())
    }

    fn pulse_us(&self) -> u16 {
        self.pulse_us
    }

    fn set_duty_cycle(&mut self, duty_cycle: f32) -> Result<()> {
        if !(0.0..=1.0).contains(&duty_cycle) {
            return Err(PlatformError::Pwm(PwmError::InvalidDutyCycle));
        }
        let pulse_us = duty_cycle * frame_period_us(self.frequency) as f32;
        self.set_pulse_us(pulse_us as u16)
    }

    fn duty_cycle(&self) -> f32 {
        self.pulse_to_compare(self.pulse_us) as f32 / self.period_counts() as f32
    }

    fn set_frequency(&mut self, frequency: u32) -> Result<()> {
        if frequency == 0 {
            return Err(PlatformError::Pwm(PwmError::InvalidFrequency));
        }

        // f = sys_clock / (div * (top + 1)); smallest integer divider that
        // keeps top within 16 bits gives the finest pulse resolution
        let counts = self.sys_clock_hz / frequency;
        if counts < 2 {
            return Err(PlatformError::Pwm(PwmError::InvalidFrequency));
        }
        let divider = counts.div_ceil(MAX_TOP + 1).max(1);
        if divider > u8::MAX as u32 {
            return Err(PlatformError::Pwm(PwmError::InvalidFrequency));
        }
        let top = counts / divider - 1;

        self.slice.set_div_int(divider as u8);
        self.slice.set_div_frac(0);
        self.slice.set_top(top as u16);
        self.divider = divider;
        self.frequency = frequency;

        // Same high time at the new tick rate; a pulse that no longer fits
        // is cut to the frame
        let pulse_us = self.pulse_us.min(frame_period_us(frequency).min(u16::MAX as u32) as u16);
        self.set_pulse_us(pulse_us)
    }

    fn frequency(&self) -> u32 {
        self.frequency
    }

    fn enable(&mut self) {
        self.slice.enable();
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.slice.disable();
        self.enabled = false;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
