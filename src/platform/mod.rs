//! Platform abstraction layer
//!
//! This module provides hardware abstraction for the PWM outputs that carry
//! the final pulse widths. All platform-specific code is isolated here.

pub mod error;
pub mod traits;

// Platform implementations (feature-gated)
#[cfg(feature = "pico2_w")]
pub mod rp2350;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{PlatformError, PwmError, Result};
pub use traits::{PwmConfig, PwmInterface};
