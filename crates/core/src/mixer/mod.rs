//! Airframe mixing
//!
//! Data flows one way per control cycle:
//!
//! - [`catalog`]: compiled-in airframe matrices
//! - [`config`]: resolved working matrix and tunables
//! - [`engine`]: linear and special-case mixing, motor limits
//! - [`fixed_wing`], [`flying_wing`], [`gimbal`]: special-case mixers
//! - [`servo`]: per-servo reversal, center and endpoints

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod fixed_wing;
pub mod flying_wing;
pub mod gimbal;
pub mod servo;

pub use catalog::{Airframe, MixerKind, MixerProfile, MixerRule, MAX_MOTORS};
pub use config::{
    CustomMixer, ElevonSettings, FeatureFlags, GimbalFlags, GimbalSettings, MixerConfiguration,
    MixerSettings, ServoRange, ThrottleLimits,
};
pub use engine::{MixEngine, MixFault, MixInputs, MixOutput};
pub use error::MixerError;
pub use fixed_wing::{FixedWingMixer, FixedWingSettings, FlapActuatorState, FlapMode};
pub use servo::{ServoLimits, MAX_SERVOS};
