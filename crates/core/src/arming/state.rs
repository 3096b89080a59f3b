//! Arming state snapshot
//!
//! # Safety
//!
//! **CRITICAL**: Any one of these conditions locks every motor output at the
//! configured minimum pulse:
//! - `armed == false`
//! - `SafetyFlags::DISARMED` set
//! - monopolar throttle below `idle_threshold`

use bitflags::bitflags;

/// Default armed idle threshold (μs above the throttle zero offset)
pub const DEFAULT_IDLE_THRESHOLD: i16 = 50;

bitflags! {
    /// Global error flags consumed by the output safety gate
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SafetyFlags: u8 {
        /// Vehicle disarmed by the arming or failsafe logic
        const DISARMED = 0b0000_0001;
        /// Throttle was high when the output stage came up; hold outputs
        const THROTTLE_HIGH = 0b0000_0010;
    }
}

/// Armed/disarmed state plus throttle floor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmingState {
    /// Vehicle armed
    pub armed: bool,
    /// Monopolar throttle below this keeps motors at minimum (μs)
    pub idle_threshold: i16,
}

impl Default for ArmingState {
    fn default() -> Self {
        Self {
            armed: false,
            idle_threshold: DEFAULT_IDLE_THRESHOLD,
        }
    }
}

impl ArmingState {
    /// Armed state with the default idle threshold
    pub fn armed() -> Self {
        Self {
            armed: true,
            ..Self::default()
        }
    }

    /// True when motors must not spin regardless of throttle
    pub fn motors_locked(&self, flags: SafetyFlags) -> bool {
        !self.armed || flags.contains(SafetyFlags::DISARMED)
    }

    /// True when the monopolar throttle is below the idle threshold
    pub fn below_idle(&self, monopolar_throttle: i16) -> bool {
        monopolar_throttle < self.idle_threshold
    }
}
