//! Output Channel Parameter Definitions
//!
//! Eight physical outputs, each described by six parameters (n = 1..8):
//!
//! - `SERVOn_FUNC` - 0 disabled, 1 motor, 2 servo
//! - `SERVOn_SRC` - Motor slot or servo output feeding the channel (0-based)
//! - `SERVOn_REV` - Non-zero reverses a servo
//! - `SERVOn_TRIM` - Neutral pulse (μs)
//! - `SERVOn_MIN` / `SERVOn_MAX` - Endpoints (μs)
//!
//! plus `MOT_PWM_MIN`, the pulse the safety override writes to every motor
//! channel (μs).
//!
//! Default layout: outputs 1-4 drive motors 0-3, outputs 5-8 drive servo
//! outputs 0-3.

use super::error::ParameterError;
use super::storage::{indexed_name, ParamFlags, ParamValue, ParameterStore};
use crate::output::{ChannelConfig, ChannelRole, ConfigError, MAX_OUTPUTS, MOTOR_MIN_PULSE_US};

const PREFIX: &str = "SERVO";

/// Function code for a disabled output
pub const FUNCTION_DISABLED: i32 = 0;
/// Function code for a motor output
pub const FUNCTION_MOTOR: i32 = 1;
/// Function code for a servo output
pub const FUNCTION_SERVO: i32 = 2;

/// Raw parameters of one output channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelOutputParams {
    pub function: i32,
    pub source: i32,
    pub reversed: bool,
    pub trim: i32,
    pub min: i32,
    pub max: i32,
}

impl ChannelOutputParams {
    fn default_for(index: usize) -> Self {
        let half = MAX_OUTPUTS / 2;
        if index < half {
            Self::from_config(FUNCTION_MOTOR, &ChannelConfig::motor(index as u8))
        } else {
            Self::from_config(FUNCTION_SERVO, &ChannelConfig::servo((index - half) as u8))
        }
    }

    fn from_config(function: i32, config: &ChannelConfig) -> Self {
        Self {
            function,
            source: config.source as i32,
            reversed: config.direction < 0,
            trim: config.center as i32,
            min: config.endpoint_low as i32,
            max: config.endpoint_high as i32,
        }
    }

    /// Convert to a channel configuration
    ///
    /// Returns `Ok(None)` for a disabled output. Values are only narrowed
    /// here; range checks belong to `ChannelMap::new`.
    pub fn to_config(&self, channel: usize) -> Result<Option<ChannelConfig>, ConfigError> {
        let role = match self.function {
            FUNCTION_DISABLED => return Ok(None),
            FUNCTION_MOTOR => ChannelRole::Motor,
            FUNCTION_SERVO => ChannelRole::Servo,
            _ => return Err(ConfigError::UnknownFunction { channel }),
        };
        if !(0..=u8::MAX as i32).contains(&self.source) {
            return Err(ConfigError::SourceOutOfRange { channel });
        }

        Ok(Some(ChannelConfig {
            role,
            source: self.source as u8,
            direction: if self.reversed { -1 } else { 1 },
            center: narrow(self.trim),
            endpoint_low: narrow(self.min),
            endpoint_high: narrow(self.max),
        }))
    }
}

/// Saturate into `u16`; out-of-range pulses then fail channel validation
fn narrow(value: i32) -> u16 {
    value.clamp(0, u16::MAX as i32) as u16
}

/// Output channel parameters loaded from parameter store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelParams {
    pub outputs: [ChannelOutputParams; MAX_OUTPUTS],
    pub motor_min_pulse: i32,
}

impl ChannelParams {
    /// Register channel parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        for index in 0..MAX_OUTPUTS {
            let defaults = ChannelOutputParams::default_for(index);
            let entries = [
                ("FUNC", ParamValue::Int(defaults.function)),
                ("SRC", ParamValue::Int(defaults.source)),
                ("REV", ParamValue::Int(defaults.reversed as i32)),
                ("TRIM", ParamValue::Int(defaults.trim)),
                ("MIN", ParamValue::Int(defaults.min)),
                ("MAX", ParamValue::Int(defaults.max)),
            ];
            for (suffix, value) in entries {
                let name = indexed_name(PREFIX, index, suffix)?;
                store.register(name.as_str(), value, ParamFlags::empty())?;
            }
        }
        store.register(
            "MOT_PWM_MIN",
            ParamValue::Int(MOTOR_MIN_PULSE_US as i32),
            ParamFlags::empty(),
        )?;
        Ok(())
    }

    /// Load channel parameters from parameter store
    pub fn from_store(store: &ParameterStore) -> Result<Self, ParameterError> {
        let mut outputs = [ChannelOutputParams::default_for(0); MAX_OUTPUTS];
        for (index, output) in outputs.iter_mut().enumerate() {
            let defaults = ChannelOutputParams::default_for(index);
            let read = |suffix: &str, default: i32| -> Result<i32, ParameterError> {
                let name = indexed_name(PREFIX, index, suffix)?;
                Ok(store.int_or(name.as_str(), default))
            };

            *output = ChannelOutputParams {
                function: read("FUNC", defaults.function)?,
                source: read("SRC", defaults.source)?,
                reversed: read("REV", defaults.reversed as i32)? != 0,
                trim: read("TRIM", defaults.trim)?,
                min: read("MIN", defaults.min)?,
                max: read("MAX", defaults.max)?,
            };
        }
        Ok(Self {
            outputs,
            motor_min_pulse: store.int_or("MOT_PWM_MIN", MOTOR_MIN_PULSE_US as i32),
        })
    }

    /// Motor minimum pulse, saturated into `u16`
    pub fn motor_min_pulse(&self) -> u16 {
        narrow(self.motor_min_pulse)
    }

    /// Channel configurations for `ChannelMap::new`
    pub fn to_configs(&self) -> Result<[Option<ChannelConfig>; MAX_OUTPUTS], ConfigError> {
        let mut configs = [None; MAX_OUTPUTS];
        for (index, output) in self.outputs.iter().enumerate() {
            configs[index] = output.to_config(index)?;
        }
        Ok(configs)
    }
}
