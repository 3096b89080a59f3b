//! Airframe catalog
//!
//! Compiled-in mixing matrices for every supported airframe. Each entry
//! carries its motor count, whether it drives servos, and a [`MixerKind`]
//! telling the engine how to mix it.
//!
//! # Coefficients
//!
//! Rows are `{throttle, roll, pitch, yaw}` per motor, in motor output order.
//! Geometry constants: `0.866025` = cos 30°, `0.707107` = cos 45°,
//! `1.333333` / `0.666667` = tricopter tail/front arm ratio.

use super::error::MixerError;

/// Maximum number of motors a mixer may drive
pub const MAX_MOTORS: usize = 12;

/// Per-motor mixing coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixerRule {
    pub throttle: f32,
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
}

impl MixerRule {
    /// Sentinel row marking the end of a custom table
    pub const UNUSED: MixerRule = MixerRule::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(throttle: f32, roll: f32, pitch: f32, yaw: f32) -> Self {
        Self {
            throttle,
            roll,
            pitch,
            yaw,
        }
    }

    /// A row is in use when its throttle coefficient is non-zero
    pub fn is_used(&self) -> bool {
        self.throttle != 0.0
    }
}

const fn r(throttle: f32, roll: f32, pitch: f32, yaw: f32) -> MixerRule {
    MixerRule::new(throttle, roll, pitch, yaw)
}

static MIXER_TRI: [MixerRule; 3] = [
    r(1.0, 0.0, 1.333333, 0.0),   // REAR
    r(1.0, -1.0, -0.666667, 0.0), // RIGHT
    r(1.0, 1.0, -0.666667, 0.0),  // LEFT
];

static MIXER_QUAD_P: [MixerRule; 4] = [
    r(1.0, 0.0, 1.0, -1.0),  // REAR
    r(1.0, -1.0, 0.0, 1.0),  // RIGHT
    r(1.0, 1.0, 0.0, 1.0),   // LEFT
    r(1.0, 0.0, -1.0, -1.0), // FRONT
];

static MIXER_QUAD_X: [MixerRule; 4] = [
    r(1.0, -1.0, 1.0, -1.0), // REAR_R
    r(1.0, -1.0, -1.0, 1.0), // FRONT_R
    r(1.0, 1.0, 1.0, 1.0),   // REAR_L
    r(1.0, 1.0, -1.0, -1.0), // FRONT_L
];

static MIXER_BI: [MixerRule; 2] = [
    r(1.0, 1.0, 0.0, 0.0),  // LEFT
    r(1.0, -1.0, 0.0, 0.0), // RIGHT
];

static MIXER_Y6: [MixerRule; 6] = [
    r(1.0, 0.0, 1.333333, 1.0),    // REAR
    r(1.0, -1.0, -0.666667, -1.0), // RIGHT
    r(1.0, 1.0, -0.666667, -1.0),  // LEFT
    r(1.0, 0.0, 1.333333, -1.0),   // UNDER_REAR
    r(1.0, -1.0, -0.666667, 1.0),  // UNDER_RIGHT
    r(1.0, 1.0, -0.666667, 1.0),   // UNDER_LEFT
];

static MIXER_HEX6_P: [MixerRule; 6] = [
    r(1.0, -1.0, 0.866025, 1.0),   // REAR_R
    r(1.0, -1.0, -0.866025, -1.0), // FRONT_R
    r(1.0, 1.0, 0.866025, 1.0),    // REAR_L
    r(1.0, 1.0, -0.866025, -1.0),  // FRONT_L
    r(1.0, 0.0, -0.866025, 1.0),   // FRONT
    r(1.0, 0.0, 0.866025, -1.0),   // REAR
];

static MIXER_Y4: [MixerRule; 4] = [
    r(1.0, 0.0, 1.0, -1.0), // REAR_TOP CW
    r(1.0, -1.0, -1.0, 0.0), // FRONT_R CCW
    r(1.0, 0.0, 1.0, 1.0),  // REAR_BOTTOM CCW
    r(1.0, 1.0, -1.0, 0.0), // FRONT_L CW
];

static MIXER_HEX6_X: [MixerRule; 6] = [
    r(1.0, -0.866025, 1.0, 1.0),   // REAR_R
    r(1.0, -0.866025, -1.0, 1.0),  // FRONT_R
    r(1.0, 0.866025, 1.0, -1.0),   // REAR_L
    r(1.0, 0.866025, -1.0, -1.0),  // FRONT_L
    r(1.0, -0.866025, 0.0, -1.0),  // RIGHT
    r(1.0, 0.866025, 0.0, 1.0),    // LEFT
];

static MIXER_OCTO_X8: [MixerRule; 8] = [
    r(1.0, -1.0, 1.0, -1.0), // REAR_R
    r(1.0, -1.0, -1.0, 1.0), // FRONT_R
    r(1.0, 1.0, 1.0, 1.0),   // REAR_L
    r(1.0, 1.0, -1.0, -1.0), // FRONT_L
    r(1.0, -1.0, 1.0, 1.0),  // UNDER_REAR_R
    r(1.0, -1.0, -1.0, -1.0), // UNDER_FRONT_R
    r(1.0, 1.0, 1.0, -1.0),  // UNDER_REAR_L
    r(1.0, 1.0, -1.0, 1.0),  // UNDER_FRONT_L
];

static MIXER_OCTO_FLAT_P: [MixerRule; 8] = [
    r(1.0, 0.707107, -0.707107, 1.0),  // FRONT_L
    r(1.0, -0.707107, -0.707107, 1.0), // FRONT_R
    r(1.0, -0.707107, 0.707107, 1.0),  // REAR_R
    r(1.0, 0.707107, 0.707107, 1.0),   // REAR_L
    r(1.0, 0.0, -1.0, -1.0),           // FRONT
    r(1.0, -1.0, 0.0, -1.0),           // RIGHT
    r(1.0, 0.0, 1.0, -1.0),            // REAR
    r(1.0, 1.0, 0.0, -1.0),            // LEFT
];

static MIXER_OCTO_FLAT_X: [MixerRule; 8] = [
    r(1.0, 1.0, -0.5, 1.0),  // MIDFRONT_L
    r(1.0, -0.5, -1.0, 1.0), // FRONT_R
    r(1.0, -1.0, 0.5, 1.0),  // MIDREAR_R
    r(1.0, 0.5, 1.0, 1.0),   // REAR_L
    r(1.0, 0.5, -1.0, -1.0), // FRONT_L
    r(1.0, -1.0, -0.5, -1.0), // MIDFRONT_R
    r(1.0, -0.5, 1.0, -1.0), // REAR_R
    r(1.0, 1.0, 0.5, -1.0),  // MIDREAR_L
];

static MIXER_VTAIL4: [MixerRule; 4] = [
    r(1.0, 0.0, 1.0, 1.0),   // REAR_R
    r(1.0, -1.0, -1.0, 0.0), // FRONT_R
    r(1.0, 0.0, 1.0, -1.0),  // REAR_L
    r(1.0, 1.0, -1.0, 0.0),  // FRONT_L
];

/// How an airframe is mixed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MixerKind {
    /// Pure linear combination of the matrix rows
    Linear(&'static [MixerRule]),
    /// Linear motors plus a yaw-tilt servo pair
    Bicopter(&'static [MixerRule]),
    /// Linear motors plus a tail yaw servo
    Tricopter(&'static [MixerRule]),
    /// Two-axis camera gimbal, no motors
    Gimbal,
    /// Elevon mixing with a single motor
    FlyingWing,
    /// Aileron/flap/rudder/elevator mixing with up to two motors
    FixedWing,
    /// User-defined matrix loaded from the custom table
    Custom,
    /// Catalog entry with no mixer implementation
    Unmixed,
}

impl MixerKind {
    /// Catalog motor matrix, if the airframe has one
    pub fn matrix(&self) -> Option<&'static [MixerRule]> {
        match self {
            MixerKind::Linear(m) | MixerKind::Bicopter(m) | MixerKind::Tricopter(m) => Some(m),
            _ => None,
        }
    }
}

/// Immutable catalog entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixerProfile {
    /// Motors driven by this airframe
    pub motor_count: u8,
    /// Airframe drives at least one servo
    pub uses_servo: bool,
    /// Mixing strategy
    pub kind: MixerKind,
}

const fn profile(motor_count: u8, uses_servo: bool, kind: MixerKind) -> MixerProfile {
    MixerProfile {
        motor_count,
        uses_servo,
        kind,
    }
}

/// Supported airframes
///
/// Discriminants are the persisted selection index. Zero is never valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Airframe {
    Tricopter = 1,
    QuadPlus = 2,
    QuadX = 3,
    Bicopter = 4,
    Gimbal = 5,
    Y6 = 6,
    Hex6Plus = 7,
    FlyingWing = 8,
    Y4 = 9,
    Hex6X = 10,
    OctoX8 = 11,
    OctoFlatPlus = 12,
    OctoFlatX = 13,
    Airplane = 14,
    Heli120Ccpm = 15,
    Heli90Deg = 16,
    VTail4 = 17,
    Custom = 18,
}

impl Airframe {
    /// Every airframe in selection order
    pub const ALL: [Airframe; 18] = [
        Airframe::Tricopter,
        Airframe::QuadPlus,
        Airframe::QuadX,
        Airframe::Bicopter,
        Airframe::Gimbal,
        Airframe::Y6,
        Airframe::Hex6Plus,
        Airframe::FlyingWing,
        Airframe::Y4,
        Airframe::Hex6X,
        Airframe::OctoX8,
        Airframe::OctoFlatPlus,
        Airframe::OctoFlatX,
        Airframe::Airplane,
        Airframe::Heli120Ccpm,
        Airframe::Heli90Deg,
        Airframe::VTail4,
        Airframe::Custom,
    ];

    /// Resolve a persisted selection index
    ///
    /// # Errors
    ///
    /// Returns `MixerError::UnknownAirframe` for 0 or anything past `Custom`.
    pub fn from_index(index: i32) -> Result<Self, MixerError> {
        if index < 1 || index > Self::ALL.len() as i32 {
            return Err(MixerError::UnknownAirframe { index });
        }
        Ok(Self::ALL[(index - 1) as usize])
    }

    /// Persisted selection index
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Catalog entry for this airframe
    pub fn profile(self) -> MixerProfile {
        match self {
            Airframe::Tricopter => profile(3, true, MixerKind::Tricopter(&MIXER_TRI)),
            Airframe::QuadPlus => profile(4, false, MixerKind::Linear(&MIXER_QUAD_P)),
            Airframe::QuadX => profile(4, false, MixerKind::Linear(&MIXER_QUAD_X)),
            Airframe::Bicopter => profile(2, true, MixerKind::Bicopter(&MIXER_BI)),
            Airframe::Gimbal => profile(0, true, MixerKind::Gimbal),
            Airframe::Y6 => profile(6, false, MixerKind::Linear(&MIXER_Y6)),
            Airframe::Hex6Plus => profile(6, false, MixerKind::Linear(&MIXER_HEX6_P)),
            Airframe::FlyingWing => profile(1, true, MixerKind::FlyingWing),
            Airframe::Y4 => profile(4, false, MixerKind::Linear(&MIXER_Y4)),
            Airframe::Hex6X => profile(6, false, MixerKind::Linear(&MIXER_HEX6_X)),
            Airframe::OctoX8 => profile(8, false, MixerKind::Linear(&MIXER_OCTO_X8)),
            Airframe::OctoFlatPlus => profile(8, false, MixerKind::Linear(&MIXER_OCTO_FLAT_P)),
            Airframe::OctoFlatX => profile(8, false, MixerKind::Linear(&MIXER_OCTO_FLAT_X)),
            Airframe::Airplane => profile(2, true, MixerKind::FixedWing),
            Airframe::Heli120Ccpm => profile(0, true, MixerKind::Unmixed),
            Airframe::Heli90Deg => profile(0, true, MixerKind::Unmixed),
            Airframe::VTail4 => profile(4, false, MixerKind::Linear(&MIXER_VTAIL4)),
            Airframe::Custom => profile(0, false, MixerKind::Custom),
        }
    }

    /// Short name for logs
    pub fn name(self) -> &'static str {
        match self {
            Airframe::Tricopter => "TRI",
            Airframe::QuadPlus => "QUADP",
            Airframe::QuadX => "QUADX",
            Airframe::Bicopter => "BI",
            Airframe::Gimbal => "GIMBAL",
            Airframe::Y6 => "Y6",
            Airframe::Hex6Plus => "HEX6",
            Airframe::FlyingWing => "FLYING_WING",
            Airframe::Y4 => "Y4",
            Airframe::Hex6X => "HEX6X",
            Airframe::OctoX8 => "OCTOX8",
            Airframe::OctoFlatPlus => "OCTOFLATP",
            Airframe::OctoFlatX => "OCTOFLATX",
            Airframe::Airplane => "AIRPLANE",
            Airframe::Heli120Ccpm => "HELI_120_CCPM",
            Airframe::Heli90Deg => "HELI_90_DEG",
            Airframe::VTail4 => "VTAIL4",
            Airframe::Custom => "CUSTOM",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_index_bounds() {
        assert_eq!(
            Airframe::from_index(0),
            Err(MixerError::UnknownAirframe { index: 0 })
        );
        assert_eq!(Airframe::from_index(1), Ok(Airframe::Tricopter));
        assert_eq!(Airframe::from_index(18), Ok(Airframe::Custom));
        assert_eq!(
            Airframe::from_index(19),
            Err(MixerError::UnknownAirframe { index: 19 })
        );
        assert!(Airframe::from_index(-3).is_err());
    }

    #[test]
    fn test_index_round_trips() {
        for airframe in Airframe::ALL {
            assert_eq!(Airframe::from_index(airframe.index() as i32), Ok(airframe));
        }
    }

    #[test]
    fn test_matrix_rows_match_motor_count() {
        for airframe in Airframe::ALL {
            let profile = airframe.profile();
            if let Some(matrix) = profile.kind.matrix() {
                assert_eq!(matrix.len(), profile.motor_count as usize, "{}", airframe.name());
                assert!(matrix.iter().all(MixerRule::is_used));
            }
        }
    }

    #[test]
    fn test_symmetric_frames_have_balanced_torque() {
        // Yaw and roll contributions cancel across all motors on symmetric frames
        for airframe in [Airframe::QuadX, Airframe::QuadPlus, Airframe::Hex6X, Airframe::OctoX8] {
            let matrix = airframe.profile().kind.matrix().unwrap();
            let yaw: f32 = matrix.iter().map(|m| m.yaw).sum();
            let roll: f32 = matrix.iter().map(|m| m.roll).sum();
            assert!(yaw.abs() < 1e-4, "{}", airframe.name());
            assert!(roll.abs() < 1e-4, "{}", airframe.name());
        }
    }

    #[test]
    fn test_special_airframes_have_no_matrix() {
        assert_eq!(Airframe::Gimbal.profile().kind, MixerKind::Gimbal);
        assert_eq!(Airframe::FlyingWing.profile().motor_count, 1);
        assert_eq!(Airframe::Airplane.profile().kind, MixerKind::FixedWing);
        assert!(Airframe::Airplane.profile().kind.matrix().is_none());
        assert_eq!(Airframe::Heli90Deg.profile().kind, MixerKind::Unmixed);
    }
}
