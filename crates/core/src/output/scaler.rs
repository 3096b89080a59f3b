//! Output scaler and safety gate
//!
//! Converts a composed frame from the internal output representation into
//! physical pulse widths, then applies the last safety override.
//!
//! # Internal representation
//!
//! | Role | Internal range | Pulse range | Re-span |
//! |------|----------------|-------------|---------|
//! | Servo | 2500-5000 | 875-2125 μs | `((v - 3750) >> 1) + 1500` |
//! | Motor | 2500-5000 | 1000-2000 μs | `((v << 2) + 5) / 10` |
//!
//! The motor re-span rounds to nearest: adding 5 before the truncating divide
//! by 10 lands on the closest microsecond instead of the one below. Encoding with
//! [`encode_motor`] / [`encode_servo`] followed by the re-span returns the
//! original pulse exactly.
//!
//! # Safety
//!
//! **CRITICAL**: Every motor channel is forced to the minimum pulse when the
//! monopolar throttle is below the idle threshold or the vehicle is
//! disarmed. This override runs after all mixing and wins over it.

use super::channel::{ChannelRole, MAX_OUTPUTS};
use crate::arming::{ArmingState, SafetyFlags};

/// Servo internal value at center
pub const SERVO_INNER_OFFSET: i32 = 3750;

/// Servo center pulse (μs)
pub const SERVO_CENTER_US: i32 = 1500;

/// Added before the motor divide to round to nearest
pub const MOTOR_ROUNDING: u32 = 5;

/// Motor re-span divisor (internal counts × 4 / 10 = μs)
pub const MOTOR_SCALE_DIVISOR: u32 = 10;

/// Shortest pulse a channel may be configured for (μs)
pub const PULSE_MIN_US: u16 = 500;

/// Longest pulse a channel may be configured for (μs)
pub const PULSE_MAX_US: u16 = 2500;

/// Default motor minimum pulse (μs)
pub const MOTOR_MIN_PULSE_US: u16 = 1000;

/// Servo pulse (μs) to internal units
pub fn encode_servo(pulse_us: u16) -> u16 {
    (((pulse_us as i32 - SERVO_CENTER_US) << 1) + SERVO_INNER_OFFSET) as u16
}

/// Motor pulse (μs) to internal units
pub fn encode_motor(pulse_us: u16) -> u16 {
    (pulse_us as u32 * MOTOR_SCALE_DIVISOR / 4) as u16
}

/// Internal servo value to pulse width (μs)
pub fn servo_to_pulse(value: u16) -> u16 {
    (((value as i32 - SERVO_INNER_OFFSET) >> 1) + SERVO_CENTER_US) as u16
}

/// Internal motor value to pulse width (μs), rounded to nearest
pub fn motor_to_pulse(value: u16) -> u16 {
    ((((value as u32) << 2) + MOTOR_ROUNDING) / MOTOR_SCALE_DIVISOR) as u16
}

/// One pulse value per physical channel
///
/// Holds internal units after composition and pulse widths after
/// [`OutputScaler::process`]. Disabled channels are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputFrame {
    pub pulses: [u16; MAX_OUTPUTS],
}

/// Raw throttle channel and its calibrated zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleSample {
    /// Latest raw throttle pulse (μs)
    pub raw: i16,
    /// Calibrated throttle zero (μs)
    pub zero_offset: u16,
}

impl ThrottleSample {
    /// Throttle above its zero
    pub fn monopolar(&self) -> i16 {
        self.raw.saturating_sub(self.zero_offset as i16)
    }
}

/// What the gate decided for this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Frame is ready to hand to the pulse generator
    Publish {
        /// Motor channels were overridden to the minimum pulse
        motors_locked: bool,
    },
    /// Throttle-high fault: keep the previous buffer
    Hold,
}

/// Re-spans frames and applies the throttle-floor override
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputScaler {
    roles: [Option<ChannelRole>; MAX_OUTPUTS],
    motor_min_pulse: u16,
}

impl OutputScaler {
    /// Create a scaler for a channel layout
    pub fn new(roles: [Option<ChannelRole>; MAX_OUTPUTS], motor_min_pulse: u16) -> Self {
        Self {
            roles,
            motor_min_pulse,
        }
    }

    /// Internal units to pulse widths, in place
    pub fn rescale(&self, frame: &mut OutputFrame) {
        for (pulse, role) in frame.pulses.iter_mut().zip(self.roles.iter()) {
            *pulse = match role {
                Some(ChannelRole::Servo) => servo_to_pulse(*pulse),
                Some(ChannelRole::Motor) => motor_to_pulse(*pulse),
                None => 0,
            };
        }
    }

    /// Force every motor channel to the minimum pulse
    pub fn lock_motors(&self, frame: &mut OutputFrame) {
        for (pulse, role) in frame.pulses.iter_mut().zip(self.roles.iter()) {
            if *role == Some(ChannelRole::Motor) {
                *pulse = self.motor_min_pulse;
            }
        }
    }

    /// Re-span and gate one frame
    ///
    /// # Arguments
    ///
    /// * `frame` - Composed frame in internal units, rewritten to μs
    /// * `throttle` - Latest raw throttle and its zero offset
    /// * `arming` - Armed state and idle threshold
    /// * `flags` - Global error flags
    ///
    /// # Returns
    ///
    /// `Hold` when `THROTTLE_HIGH` is set; the frame must then be discarded.
    pub fn process(
        &self,
        frame: &mut OutputFrame,
        throttle: ThrottleSample,
        arming: &ArmingState,
        flags: SafetyFlags,
    ) -> GateDecision {
        self.rescale(frame);

        let motors_locked =
            arming.below_idle(throttle.monopolar()) || arming.motors_locked(flags);
        if motors_locked {
            self.lock_motors(frame);
        }

        if flags.contains(SafetyFlags::THROTTLE_HIGH) {
            GateDecision::Hold
        } else {
            GateDecision::Publish { motors_locked }
        }
    }
}
