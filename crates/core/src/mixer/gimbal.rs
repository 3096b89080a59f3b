//! Gimbal and camera-tilt mixing
//!
//! Two outputs: pitch tilt on servo slot 0, roll tilt on slot 1. Angle
//! compensation is `gain * angle / 16` with angles in decidegrees.

use super::config::{GimbalFlags, GimbalSettings};
use crate::rc::{AttitudeAngles, ControlDemand};

fn angle_term(gain: i16, angle: i16) -> i32 {
    gain as i32 * angle as i32 / 16
}

/// Dedicated gimbal airframe
///
/// Each axis holds its middle, offset by angle compensation and the pilot's
/// stick on that axis, clamped to the axis range.
pub fn stabilize_gimbal(
    settings: &GimbalSettings,
    demand: &ControlDemand,
    attitude: &AttitudeAngles,
) -> [i16; 2] {
    let pitch = settings.pitch.middle as i32
        + angle_term(settings.pitch_gain, attitude.pitch)
        + demand.pitch as i32;
    let roll = settings.roll.middle as i32
        + angle_term(settings.roll_gain, attitude.roll)
        + demand.roll as i32;

    [settings.pitch.clamp(pitch), settings.roll.clamp(roll)]
}

/// Camera tilt on top of any airframe
///
/// Pitch follows AUX3 when `NORMAL` or `TILT_ONLY` is set, roll follows AUX4
/// unless `DISABLE_AUX34` is set. With `camstab` active the attitude is
/// blended in, either per axis or mixed across both outputs (`MIX_TILT`).
pub fn camera_tilt(
    settings: &GimbalSettings,
    demand: &ControlDemand,
    mid_rc: u16,
    attitude: &AttitudeAngles,
    camstab: bool,
) -> [i16; 2] {
    let flags = settings.flags;
    let mut aux = [0i32; 2];

    if flags.intersects(GimbalFlags::NORMAL | GimbalFlags::TILT_ONLY) {
        aux[0] = demand.aux_centered(2, mid_rc) as i32;
    }
    if !flags.contains(GimbalFlags::DISABLE_AUX34) {
        aux[1] = demand.aux_centered(3, mid_rc) as i32;
    }

    let mut pitch = settings.pitch.middle as i32 + aux[0];
    let mut roll = settings.roll.middle as i32 + aux[1];

    if camstab {
        let pitch_term = angle_term(settings.pitch_gain, attitude.pitch);
        let roll_term = angle_term(settings.roll_gain, attitude.roll);

        if flags.contains(GimbalFlags::MIX_TILT) {
            pitch -= -pitch_term - roll_term;
            roll += -pitch_term + roll_term;
        } else {
            pitch += pitch_term;
            roll += roll_term;
        }
    }

    [settings.pitch.clamp(pitch), settings.roll.clamp(roll)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mixer::config::ServoRange;

    fn settings(flags: GimbalFlags) -> GimbalSettings {
        GimbalSettings {
            flags,
            pitch_gain: 16,
            roll_gain: 8,
            pitch: ServoRange::new(1500, 1000, 2000),
            roll: ServoRange::new(1500, 1000, 2000),
        }
    }

    fn demand(aux3: u16, aux4: u16) -> ControlDemand {
        ControlDemand {
            aux: [1500, 1500, aux3, aux4],
            ..ControlDemand::default()
        }
    }

    #[test]
    fn test_gimbal_airframe_adds_angle_and_stick() {
        let demand = ControlDemand {
            pitch: 20,
            roll: -10,
            ..ControlDemand::default()
        };
        let attitude = AttitudeAngles {
            pitch: 100,
            roll: 32,
        };
        let out = stabilize_gimbal(&settings(GimbalFlags::NORMAL), &demand, &attitude);
        assert_eq!(out, [1500 + 100 + 20, 1500 + 16 - 10]);
    }

    #[test]
    fn test_gimbal_airframe_clamps() {
        let attitude = AttitudeAngles {
            pitch: 900,
            roll: -3000,
        };
        let out = stabilize_gimbal(
            &settings(GimbalFlags::NORMAL),
            &ControlDemand::default(),
            &attitude,
        );
        assert_eq!(out, [2000, 1000]);
    }

    #[test]
    fn test_tilt_follows_aux_channels() {
        let out = camera_tilt(
            &settings(GimbalFlags::NORMAL),
            &demand(1600, 1450),
            1500,
            &AttitudeAngles::default(),
            false,
        );
        assert_eq!(out, [1600, 1450]);
    }

    #[test]
    fn test_tilt_only_drives_pitch_from_aux3() {
        let out = camera_tilt(
            &settings(GimbalFlags::TILT_ONLY),
            &demand(1600, 1450),
            1500,
            &AttitudeAngles::default(),
            false,
        );
        assert_eq!(out, [1600, 1450]);

        // Without NORMAL or TILT_ONLY pitch holds its middle
        let out = camera_tilt(
            &settings(GimbalFlags::empty()),
            &demand(1600, 1450),
            1500,
            &AttitudeAngles::default(),
            false,
        );
        assert_eq!(out, [1500, 1450]);
    }

    #[test]
    fn test_tilt_aux_disabled_by_flags() {
        let out = camera_tilt(
            &settings(GimbalFlags::DISABLE_AUX34),
            &demand(1600, 1450),
            1500,
            &AttitudeAngles::default(),
            false,
        );
        assert_eq!(out, [1500, 1500]);
    }

    #[test]
    fn test_camstab_additive() {
        let attitude = AttitudeAngles {
            pitch: 32,
            roll: 64,
        };
        let out = camera_tilt(
            &settings(GimbalFlags::NORMAL),
            &demand(1500, 1500),
            1500,
            &attitude,
            true,
        );
        assert_eq!(out, [1500 + 32, 1500 + 32]);
    }

    #[test]
    fn test_camstab_mixed_tilt() {
        let attitude = AttitudeAngles {
            pitch: 32,
            roll: 64,
        };
        let out = camera_tilt(
            &settings(GimbalFlags::NORMAL | GimbalFlags::MIX_TILT),
            &demand(1500, 1500),
            1500,
            &attitude,
            true,
        );
        // pitch term 32, roll term 32
        assert_eq!(out, [1500 + 32 + 32, 1500 - 32 + 32]);
    }

    #[test]
    fn test_camstab_inactive_ignores_attitude() {
        let attitude = AttitudeAngles {
            pitch: 320,
            roll: 640,
        };
        let out = camera_tilt(
            &settings(GimbalFlags::NORMAL),
            &demand(1500, 1500),
            1500,
            &attitude,
            false,
        );
        assert_eq!(out, [1500, 1500]);
    }
}
