//! Fixed-Wing Parameter Definitions
//!
//! # Parameters
//!
//! - `FW_FLAP_MODE` - 0 basic, 1 premixed flaperons, 2 advanced
//! - `FW_FLAP_SPD` - Cycles between flap steps (0 = no rate limit)
//! - `FW_FLAP_STEP` - Largest flap step per allowed cycle (μs, at least 1)
//! - `FW_FLAP_CH` - Flap input channel index, -1 for none
//! - `FW_AIL2_CH` - Right aileron input channel index, -1 for none
//! - `FW_FLAP_REV` - Non-zero reverses the flap before aileron mixing

use super::error::ParameterError;
use super::storage::{ParamFlags, ParamValue, ParameterStore};
use crate::mixer::{FixedWingSettings, FlapMode};
use crate::output::ConfigError;
use crate::rc::RcChannel;

/// Channel index meaning "no channel"
pub const NO_CHANNEL: i32 = -1;

/// Fixed-wing parameters loaded from parameter store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedWingParams {
    pub flap_mode: i32,
    pub flap_speed: i32,
    pub flap_step: i32,
    pub flap_channel: i32,
    pub aileron2_channel: i32,
    pub flap_reversed: bool,
}

impl FixedWingParams {
    /// Register fixed-wing parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        let defaults = FixedWingSettings::default();

        store.register("FW_FLAP_MODE", ParamValue::Int(0), ParamFlags::empty())?;
        store.register(
            "FW_FLAP_SPD",
            ParamValue::Int(defaults.flap_speed as i32),
            ParamFlags::empty(),
        )?;
        store.register(
            "FW_FLAP_STEP",
            ParamValue::Int(defaults.flap_step as i32),
            ParamFlags::empty(),
        )?;
        store.register("FW_FLAP_CH", ParamValue::Int(NO_CHANNEL), ParamFlags::empty())?;
        store.register("FW_AIL2_CH", ParamValue::Int(NO_CHANNEL), ParamFlags::empty())?;
        store.register("FW_FLAP_REV", ParamValue::Int(0), ParamFlags::empty())?;

        Ok(())
    }

    /// Load fixed-wing parameters from parameter store
    pub fn from_store(store: &ParameterStore) -> Self {
        let defaults = FixedWingSettings::default();
        Self {
            flap_mode: store.int_or("FW_FLAP_MODE", 0),
            flap_speed: store.int_or("FW_FLAP_SPD", defaults.flap_speed as i32),
            flap_step: store.int_or("FW_FLAP_STEP", defaults.flap_step as i32),
            flap_channel: store.int_or("FW_FLAP_CH", NO_CHANNEL),
            aileron2_channel: store.int_or("FW_AIL2_CH", NO_CHANNEL),
            flap_reversed: store.int_or("FW_FLAP_REV", 0) != 0,
        }
    }

    /// Validate and convert to mixer settings
    ///
    /// Speed and step saturate into range; a step of 0 would freeze the
    /// flaps, so it is raised to 1.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for an unknown flap mode or a channel index that
    /// is neither negative nor a receiver channel.
    pub fn to_settings(&self) -> Result<FixedWingSettings, ConfigError> {
        let flap_mode = FlapMode::from_index(self.flap_mode).ok_or(ConfigError::InvalidParameter {
            name: "FW_FLAP_MODE",
        })?;

        Ok(FixedWingSettings {
            flap_mode,
            flap_speed: self.flap_speed.clamp(0, u8::MAX as i32) as u8,
            flap_step: self.flap_step.clamp(1, u8::MAX as i32) as u8,
            flap_channel: channel(self.flap_channel, "FW_FLAP_CH")?,
            aileron2_channel: channel(self.aileron2_channel, "FW_AIL2_CH")?,
            flap_direction: if self.flap_reversed { -1 } else { 1 },
        })
    }
}

fn channel(index: i32, name: &'static str) -> Result<Option<RcChannel>, ConfigError> {
    if index < 0 {
        return Ok(None);
    }
    RcChannel::from_index(index)
        .map(Some)
        .ok_or(ConfigError::InvalidParameter { name })
}
