//! Mixer Parameter Definitions
//!
//! # Parameters
//!
//! - `MIX_FRAME` - Airframe catalog index (1..=18, default 3 = quad X)
//! - `MIX_YAW_DIR` - Yaw direction, +1 or -1
//! - `MIX_FEATURES` - Feature bitmask (bit 0 servo tilt, bit 1 motor stop)
//! - `RC_MID` - Receiver mid-point (μs)
//! - `THR_MIN` / `THR_MAX` - Armed motor output range (μs)
//! - `THR_MINCMD` - Motor output when disarmed or stopped (μs)
//! - `THR_MINCHK` - Throttle demand treated as "stick low" (μs)
//! - `TRI_YAW_MID` / `TRI_YAW_MIN` / `TRI_YAW_MAX` - Tricopter tail servo (μs)
//! - `BI_SRV_MID` / `BI_SRV_MIN` / `BI_SRV_MAX` - Bicopter tilt servos (μs)
//! - `WING_PITCH_L` / `WING_ROLL_L` / `WING_PITCH_R` / `WING_ROLL_R` - Elevon
//!   direction signs

use super::error::ParameterError;
use super::storage::{ParamFlags, ParamValue, ParameterStore};
use crate::mixer::{Airframe, ElevonSettings, FeatureFlags, ServoRange, ThrottleLimits};
use crate::rc::DEFAULT_MID_RC;

/// Mixer parameters loaded from parameter store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MixerParams {
    /// Raw airframe selection, validated when the mixer is resolved
    pub frame: i32,
    pub yaw_direction: i32,
    pub features: FeatureFlags,
    pub mid_rc: i32,
    pub throttle: ThrottleLimits,
    pub tricopter: ServoRange,
    pub bicopter: ServoRange,
    pub elevon: ElevonSettings,
}

impl MixerParams {
    /// Register mixer parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        let throttle = ThrottleLimits::default();

        store.register(
            "MIX_FRAME",
            ParamValue::Int(Airframe::QuadX.index() as i32),
            ParamFlags::empty(),
        )?;
        store.register("MIX_YAW_DIR", ParamValue::Int(1), ParamFlags::empty())?;
        store.register("MIX_FEATURES", ParamValue::Int(0), ParamFlags::empty())?;
        store.register(
            "RC_MID",
            ParamValue::Int(DEFAULT_MID_RC as i32),
            ParamFlags::empty(),
        )?;

        store.register(
            "THR_MIN",
            ParamValue::Int(throttle.min_throttle as i32),
            ParamFlags::empty(),
        )?;
        store.register(
            "THR_MAX",
            ParamValue::Int(throttle.max_throttle as i32),
            ParamFlags::empty(),
        )?;
        store.register(
            "THR_MINCMD",
            ParamValue::Int(throttle.min_command as i32),
            ParamFlags::empty(),
        )?;
        store.register(
            "THR_MINCHK",
            ParamValue::Int(throttle.min_check as i32),
            ParamFlags::empty(),
        )?;

        store.register("TRI_YAW_MID", ParamValue::Int(1500), ParamFlags::empty())?;
        store.register("TRI_YAW_MIN", ParamValue::Int(1020), ParamFlags::empty())?;
        store.register("TRI_YAW_MAX", ParamValue::Int(2000), ParamFlags::empty())?;
        store.register("BI_SRV_MID", ParamValue::Int(1500), ParamFlags::empty())?;
        store.register("BI_SRV_MIN", ParamValue::Int(1020), ParamFlags::empty())?;
        store.register("BI_SRV_MAX", ParamValue::Int(2000), ParamFlags::empty())?;

        // Elevon signs default to the classic left/right layout
        store.register("WING_PITCH_L", ParamValue::Int(1), ParamFlags::empty())?;
        store.register("WING_ROLL_L", ParamValue::Int(1), ParamFlags::empty())?;
        store.register("WING_PITCH_R", ParamValue::Int(1), ParamFlags::empty())?;
        store.register("WING_ROLL_R", ParamValue::Int(-1), ParamFlags::empty())?;

        Ok(())
    }

    /// Load mixer parameters from parameter store
    ///
    /// Missing parameters fall back to their defaults. Direction signs are
    /// normalized to +1/-1; range checks happen when the pipeline is built.
    pub fn from_store(store: &ParameterStore) -> Self {
        let defaults = ThrottleLimits::default();
        let throttle = ThrottleLimits {
            min_throttle: store.i16_or("THR_MIN", defaults.min_throttle),
            max_throttle: store.i16_or("THR_MAX", defaults.max_throttle),
            min_command: store.i16_or("THR_MINCMD", defaults.min_command),
            min_check: store.i16_or("THR_MINCHK", defaults.min_check),
        };

        Self {
            frame: store.int_or("MIX_FRAME", Airframe::QuadX.index() as i32),
            yaw_direction: store.int_or("MIX_YAW_DIR", 1),
            features: FeatureFlags::from_bits_truncate(store.int_or("MIX_FEATURES", 0) as u8),
            mid_rc: store.int_or("RC_MID", DEFAULT_MID_RC as i32),
            throttle,
            tricopter: ServoRange::new(
                store.i16_or("TRI_YAW_MID", 1500),
                store.i16_or("TRI_YAW_MIN", 1020),
                store.i16_or("TRI_YAW_MAX", 2000),
            ),
            bicopter: ServoRange::new(
                store.i16_or("BI_SRV_MID", 1500),
                store.i16_or("BI_SRV_MIN", 1020),
                store.i16_or("BI_SRV_MAX", 2000),
            ),
            elevon: ElevonSettings {
                pitch_left: sign(store.int_or("WING_PITCH_L", 1)),
                roll_left: sign(store.int_or("WING_ROLL_L", 1)),
                pitch_right: sign(store.int_or("WING_PITCH_R", 1)),
                roll_right: sign(store.int_or("WING_ROLL_R", -1)),
            },
        }
    }
}

/// Negative values select -1, everything else +1
pub(crate) fn sign(value: i32) -> i8 {
    if value < 0 {
        -1
    } else {
        1
    }
}
