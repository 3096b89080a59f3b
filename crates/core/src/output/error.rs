//! Configuration load errors
//!
//! Everything here is detected before the control loop starts. The running
//! pipeline never produces these.

use core::fmt;

use crate::mixer::MixerError;
use crate::parameters::ParameterError;

/// Rejected mixer or channel configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Airframe selection or custom table rejected
    Mixer(MixerError),
    /// Parameter store rejected a registration
    Parameter(ParameterError),
    /// Parameter holds a value outside its domain
    InvalidParameter {
        /// Parameter name
        name: &'static str,
    },
    /// `endpoint_low > endpoint_high`
    InvertedEndpoints { channel: usize },
    /// Center outside `[endpoint_low, endpoint_high]`
    CenterOutOfRange { channel: usize },
    /// Endpoint outside the pulse range the output stage can encode
    PulseOutOfRange { channel: usize },
    /// Direction is neither +1 nor -1
    InvalidDirection { channel: usize },
    /// Motor or servo source slot does not exist
    SourceOutOfRange { channel: usize },
    /// Motor minimum pulse lies outside a motor channel's endpoints
    MinimumOutsideEndpoints { channel: usize },
    /// Channel function code is not disabled, motor or servo
    UnknownFunction { channel: usize },
}

impl From<MixerError> for ConfigError {
    fn from(err: MixerError) -> Self {
        ConfigError::Mixer(err)
    }
}

impl From<ParameterError> for ConfigError {
    fn from(err: ParameterError) -> Self {
        ConfigError::Parameter(err)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Mixer(e) => write!(f, "mixer: {}", e),
            ConfigError::Parameter(e) => write!(f, "parameter: {}", e),
            ConfigError::InvalidParameter { name } => write!(f, "invalid value for {}", name),
            ConfigError::InvertedEndpoints { channel } => {
                write!(f, "channel {}: endpoint low above endpoint high", channel + 1)
            }
            ConfigError::CenterOutOfRange { channel } => {
                write!(f, "channel {}: center outside endpoints", channel + 1)
            }
            ConfigError::PulseOutOfRange { channel } => {
                write!(f, "channel {}: endpoint outside pulse range", channel + 1)
            }
            ConfigError::InvalidDirection { channel } => {
                write!(f, "channel {}: direction must be 1 or -1", channel + 1)
            }
            ConfigError::SourceOutOfRange { channel } => {
                write!(f, "channel {}: source slot out of range", channel + 1)
            }
            ConfigError::MinimumOutsideEndpoints { channel } => {
                write!(f, "channel {}: motor minimum outside endpoints", channel + 1)
            }
            ConfigError::UnknownFunction { channel } => {
                write!(f, "channel {}: unknown function", channel + 1)
            }
        }
    }
}
