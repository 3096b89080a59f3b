//! Parameter management types and utilities
//!
//! This module provides the parameter store and one parameter group per
//! configuration concern. [`loader`] turns a populated store into a running
//! [`ActuationPipeline`](crate::pipeline::ActuationPipeline).

pub mod arming;
pub mod channel;
pub mod custom;
pub mod error;
pub mod fixed_wing;
pub mod gimbal;
pub mod loader;
pub mod mixer;
pub mod storage;

pub use arming::ArmingParams;
pub use channel::{ChannelOutputParams, ChannelParams};
pub use custom::CustomMixerParams;
pub use error::ParameterError;
pub use fixed_wing::FixedWingParams;
pub use gimbal::GimbalParams;
pub use loader::{build_pipeline, mixer_settings, register_all};
pub use mixer::MixerParams;
pub use storage::{indexed_name, ParamFlags, ParamName, ParamValue, ParameterStore};
pub use storage::{MAX_PARAMS, PARAM_NAME_LEN};
