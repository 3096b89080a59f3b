//! Active mixer configuration
//!
//! Resolves an airframe selection (or the user's custom table) into the
//! working matrix read by the engine every cycle. A configuration is built
//! once at load time or when the airframe changes, and never mutated while
//! the control loop runs.

use bitflags::bitflags;

use super::catalog::{Airframe, MixerKind, MixerRule, MAX_MOTORS};
use super::error::MixerError;
use super::fixed_wing::FixedWingSettings;
use crate::rc::DEFAULT_MID_RC;

bitflags! {
    /// Board-level features that change mixer behavior
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FeatureFlags: u8 {
        /// Camera tilt servos on the first two servo outputs
        const SERVO_TILT = 0b0000_0001;
        /// Motors stop (instead of idling) below minimum check throttle
        const MOTOR_STOP = 0b0000_0010;
    }
}

bitflags! {
    /// Gimbal and auxiliary passthrough options
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct GimbalFlags: u8 {
        /// Pitch tilt follows AUX3
        const NORMAL = 0b0000_0001;
        /// Pitch tilt follows AUX3, roll left to stabilization
        const TILT_ONLY = 0b0000_0010;
        /// Roll tilt does not follow AUX4
        const DISABLE_AUX34 = 0b0000_0100;
        /// Copy AUX1..AUX4 straight to servo outputs
        const FORWARD_AUX = 0b0000_1000;
        /// Both tilt outputs mix pitch and roll angle
        const MIX_TILT = 0b0001_0000;
    }
}

/// Persisted user-defined mixing table
///
/// Rows are read in order until the first row with a zero throttle
/// coefficient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CustomMixer {
    rules: [MixerRule; MAX_MOTORS],
}

impl Default for CustomMixer {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomMixer {
    /// Empty table
    pub const fn new() -> Self {
        Self {
            rules: [MixerRule::UNUSED; MAX_MOTORS],
        }
    }

    /// All rows, used or not
    pub fn rules(&self) -> &[MixerRule; MAX_MOTORS] {
        &self.rules
    }

    /// Overwrite one row
    ///
    /// # Errors
    ///
    /// Returns `MixerError::SlotOutOfRange` if `slot >= MAX_MOTORS`.
    pub fn set(&mut self, slot: usize, rule: MixerRule) -> Result<(), MixerError> {
        let entry = self
            .rules
            .get_mut(slot)
            .ok_or(MixerError::SlotOutOfRange { slot })?;
        *entry = rule;
        Ok(())
    }

    /// Seed the table from a catalog airframe
    ///
    /// `index` is zero-based over the catalog (0 = tricopter). Every row's
    /// throttle is cleared first, so airframes without a matrix leave an
    /// empty table behind.
    ///
    /// # Errors
    ///
    /// Returns `MixerError::UnknownAirframe` if `index + 1` is not a catalog entry.
    pub fn load_from_catalog(&mut self, index: usize) -> Result<Airframe, MixerError> {
        let airframe = Airframe::from_index(index as i32 + 1)?;

        for rule in self.rules.iter_mut() {
            rule.throttle = 0.0;
        }

        if let Some(matrix) = airframe.profile().kind.matrix() {
            for (slot, rule) in matrix.iter().enumerate() {
                self.rules[slot] = *rule;
            }
        }

        Ok(airframe)
    }
}

/// Resolved mixer for the selected airframe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixerConfiguration {
    airframe: Airframe,
    kind: MixerKind,
    motor_count: usize,
    has_servo_outputs: bool,
    has_matrix: bool,
    rules: [MixerRule; MAX_MOTORS],
}

impl MixerConfiguration {
    /// Resolve an airframe selection
    ///
    /// # Arguments
    ///
    /// * `selection` - Persisted airframe index (1-based)
    /// * `custom` - User table, read only when `selection` is custom
    /// * `features` - `SERVO_TILT` enables servo outputs on any airframe
    ///
    /// # Errors
    ///
    /// Returns `MixerError::UnknownAirframe` for an out-of-range selection.
    pub fn resolve(
        selection: i32,
        custom: &CustomMixer,
        features: FeatureFlags,
    ) -> Result<Self, MixerError> {
        let airframe = Airframe::from_index(selection)?;
        let profile = airframe.profile();

        let mut rules = [MixerRule::UNUSED; MAX_MOTORS];
        let mut motor_count = 0;
        let has_matrix;

        if profile.kind == MixerKind::Custom {
            for rule in custom.rules().iter().take_while(|rule| rule.is_used()) {
                rules[motor_count] = *rule;
                motor_count += 1;
            }
            has_matrix = true;
        } else {
            motor_count = profile.motor_count as usize;
            has_matrix = match profile.kind.matrix() {
                Some(matrix) => {
                    rules[..matrix.len()].copy_from_slice(matrix);
                    true
                }
                None => false,
            };
        }

        Ok(Self {
            airframe,
            kind: profile.kind,
            motor_count,
            has_servo_outputs: profile.uses_servo || features.contains(FeatureFlags::SERVO_TILT),
            has_matrix,
            rules,
        })
    }

    pub fn airframe(&self) -> Airframe {
        self.airframe
    }

    pub fn kind(&self) -> MixerKind {
        self.kind
    }

    /// Number of motor outputs driven
    pub fn motor_count(&self) -> usize {
        self.motor_count
    }

    /// Servo outputs are written
    pub fn has_servo_outputs(&self) -> bool {
        self.has_servo_outputs
    }

    /// Working matrix, empty when the airframe is mixed by special-case logic only
    pub fn rules(&self) -> &[MixerRule] {
        if self.has_matrix {
            &self.rules[..self.motor_count]
        } else {
            &[]
        }
    }
}

/// Motor throttle limits (μs)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleLimits {
    /// Lowest armed motor output
    pub min_throttle: i16,
    /// Highest motor output
    pub max_throttle: i16,
    /// Motor output when disarmed or stopped
    pub min_command: i16,
    /// Throttle demand below this counts as "stick low"
    pub min_check: i16,
}

impl Default for ThrottleLimits {
    fn default() -> Self {
        Self {
            min_throttle: 1150,
            max_throttle: 1850,
            min_command: 1000,
            min_check: 1100,
        }
    }
}

/// Output range for a special-case servo (μs)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServoRange {
    pub middle: i16,
    pub min: i16,
    pub max: i16,
}

impl ServoRange {
    pub const fn new(middle: i16, min: i16, max: i16) -> Self {
        Self { middle, min, max }
    }

    pub fn clamp(&self, value: i32) -> i16 {
        value.clamp(self.min as i32, self.max as i32) as i16
    }
}

/// Camera gimbal geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GimbalSettings {
    pub flags: GimbalFlags,
    /// Pitch angle gain (applied as `gain * angle / 16`)
    pub pitch_gain: i16,
    /// Roll angle gain
    pub roll_gain: i16,
    pub pitch: ServoRange,
    pub roll: ServoRange,
}

impl Default for GimbalSettings {
    fn default() -> Self {
        Self {
            flags: GimbalFlags::NORMAL,
            pitch_gain: 10,
            roll_gain: 10,
            pitch: ServoRange::new(1500, 1020, 2000),
            roll: ServoRange::new(1500, 1020, 2000),
        }
    }
}

/// Elevon direction signs for flying-wing mixing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElevonSettings {
    pub pitch_left: i8,
    pub roll_left: i8,
    pub pitch_right: i8,
    pub roll_right: i8,
}

impl Default for ElevonSettings {
    fn default() -> Self {
        Self {
            pitch_left: 1,
            roll_left: 1,
            pitch_right: 1,
            roll_right: -1,
        }
    }
}

/// Tunables read by the engine every cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MixerSettings {
    /// +1 or -1, flips the yaw contribution of every mixer
    pub yaw_direction: i8,
    /// Receiver mid-point (μs)
    pub mid_rc: u16,
    pub features: FeatureFlags,
    pub throttle: ThrottleLimits,
    /// Tricopter tail servo
    pub tricopter: ServoRange,
    /// Bicopter tilt servos
    pub bicopter: ServoRange,
    pub gimbal: GimbalSettings,
    pub elevon: ElevonSettings,
    pub fixed_wing: FixedWingSettings,
}

impl Default for MixerSettings {
    fn default() -> Self {
        Self {
            yaw_direction: 1,
            mid_rc: DEFAULT_MID_RC,
            features: FeatureFlags::empty(),
            throttle: ThrottleLimits::default(),
            tricopter: ServoRange::new(1500, 1020, 2000),
            bicopter: ServoRange::new(1500, 1020, 2000),
            gimbal: GimbalSettings::default(),
            elevon: ElevonSettings::default(),
            fixed_wing: FixedWingSettings::default(),
        }
    }
}
