//! Flying-wing elevon mixer
//!
//! Pitch and roll share two surfaces. In pass-through the pilot's sticks
//! drive the elevons directly, otherwise the stabilization correction does.

use super::config::ElevonSettings;
use super::servo::ServoLimits;
use crate::rc::{ControlDemand, StabilizationCorrection};

/// Left and right elevon pulse widths
pub fn mix_elevons(
    settings: &ElevonSettings,
    demand: &ControlDemand,
    correction: &StabilizationCorrection,
    passthrough: bool,
    left: &ServoLimits,
    right: &ServoLimits,
) -> [i16; 2] {
    let (pitch, roll) = if passthrough {
        (demand.pitch as i32, demand.roll as i32)
    } else {
        (correction.pitch as i32, correction.roll as i32)
    };

    let left_value = settings.pitch_left as i32 * pitch + settings.roll_left as i32 * roll;
    let right_value = settings.pitch_right as i32 * pitch + settings.roll_right as i32 * roll;

    [left.apply(left_value), right.apply(right_value)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_moves_both_elevons_together() {
        let limits = ServoLimits::default();
        let demand = ControlDemand {
            pitch: 100,
            ..ControlDemand::default()
        };
        let out = mix_elevons(
            &ElevonSettings::default(),
            &demand,
            &StabilizationCorrection::default(),
            true,
            &limits,
            &limits,
        );
        assert_eq!(out, [1600, 1600]);
    }

    #[test]
    fn test_roll_moves_elevons_apart() {
        let limits = ServoLimits::default();
        let correction = StabilizationCorrection {
            roll: 50,
            pitch: 0,
            yaw: 0,
        };
        let out = mix_elevons(
            &ElevonSettings::default(),
            &ControlDemand::default(),
            &correction,
            false,
            &limits,
            &limits,
        );
        assert_eq!(out, [1550, 1450]);
    }

    #[test]
    fn test_passthrough_ignores_correction() {
        let limits = ServoLimits::default();
        let correction = StabilizationCorrection {
            roll: 200,
            pitch: 200,
            yaw: 0,
        };
        let out = mix_elevons(
            &ElevonSettings::default(),
            &ControlDemand::default(),
            &correction,
            true,
            &limits,
            &limits,
        );
        assert_eq!(out, [1500, 1500]);
    }
}
