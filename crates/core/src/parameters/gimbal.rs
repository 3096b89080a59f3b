//! Camera Gimbal Parameter Definitions
//!
//! # Parameters
//!
//! - `GMB_FLAGS` - Gimbal flag bitmask (normal, tilt only, disable aux 3/4,
//!   forward aux, mixed tilt)
//! - `GMB_P_GAIN` / `GMB_R_GAIN` - Angle gains, applied as `gain * angle / 16`
//! - `GMB_P_MID` / `GMB_P_MIN` / `GMB_P_MAX` - Pitch servo range (μs)
//! - `GMB_R_MID` / `GMB_R_MIN` / `GMB_R_MAX` - Roll servo range (μs)

use super::error::ParameterError;
use super::storage::{ParamFlags, ParamValue, ParameterStore};
use crate::mixer::{GimbalFlags, GimbalSettings, ServoRange};

/// Gimbal parameters loaded from parameter store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GimbalParams {
    pub settings: GimbalSettings,
}

impl GimbalParams {
    /// Register gimbal parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        let defaults = GimbalSettings::default();
        let entries = [
            ("GMB_FLAGS", defaults.flags.bits() as i32),
            ("GMB_P_GAIN", defaults.pitch_gain as i32),
            ("GMB_R_GAIN", defaults.roll_gain as i32),
            ("GMB_P_MID", defaults.pitch.middle as i32),
            ("GMB_P_MIN", defaults.pitch.min as i32),
            ("GMB_P_MAX", defaults.pitch.max as i32),
            ("GMB_R_MID", defaults.roll.middle as i32),
            ("GMB_R_MIN", defaults.roll.min as i32),
            ("GMB_R_MAX", defaults.roll.max as i32),
        ];
        for (name, value) in entries {
            store.register(name, ParamValue::Int(value), ParamFlags::empty())?;
        }
        Ok(())
    }

    /// Load gimbal parameters from parameter store
    ///
    /// Unknown flag bits are dropped.
    pub fn from_store(store: &ParameterStore) -> Self {
        let defaults = GimbalSettings::default();
        Self {
            settings: GimbalSettings {
                flags: GimbalFlags::from_bits_truncate(
                    store.int_or("GMB_FLAGS", defaults.flags.bits() as i32) as u8,
                ),
                pitch_gain: store.i16_or("GMB_P_GAIN", defaults.pitch_gain),
                roll_gain: store.i16_or("GMB_R_GAIN", defaults.roll_gain),
                pitch: read_range(store, ["GMB_P_MID", "GMB_P_MIN", "GMB_P_MAX"], defaults.pitch),
                roll: read_range(store, ["GMB_R_MID", "GMB_R_MIN", "GMB_R_MAX"], defaults.roll),
            },
        }
    }
}

fn read_range(store: &ParameterStore, names: [&str; 3], fallback: ServoRange) -> ServoRange {
    let [mid, min, max] = names;
    ServoRange::new(
        store.i16_or(mid, fallback.middle),
        store.i16_or(min, fallback.min),
        store.i16_or(max, fallback.max),
    )
}
