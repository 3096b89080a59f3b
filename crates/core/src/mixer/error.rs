//! Mixer error types

use core::fmt;

/// Errors from mixer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixerError {
    /// Airframe selection outside the catalog
    UnknownAirframe {
        /// Rejected selection index
        index: i32,
    },
    /// Custom mixer slot outside `MAX_MOTORS`
    SlotOutOfRange {
        /// Rejected slot
        slot: usize,
    },
}

impl fmt::Display for MixerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MixerError::UnknownAirframe { index } => {
                write!(f, "unknown airframe selection {}", index)
            }
            MixerError::SlotOutOfRange { slot } => {
                write!(f, "custom mixer slot {} out of range", slot)
            }
        }
    }
}
