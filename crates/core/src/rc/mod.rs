//! RC input state consumed by the mixer
//!
//! The receiver decoder and the stabilization loop live outside this crate.
//! They hand the mixer one [`ControlDemand`], one [`StabilizationCorrection`]
//! and one [`AttitudeAngles`] per control cycle.
//!
//! # Units
//!
//! - Throttle and auxiliary channels are raw pulse widths (μs, ~1000-2000)
//! - Roll, pitch and yaw are centered commands (±500 around zero)
//! - Attitude angles are decidegrees

/// Number of auxiliary RC channels carried in a demand
pub const AUX_CHANNELS: usize = 4;

/// Default receiver mid-point (μs)
pub const DEFAULT_MID_RC: u16 = 1500;

/// Throttle zero offset used before calibration (μs)
pub const DEFAULT_THROTTLE_OFFSET: u16 = 1000;

/// RC channel identifiers
///
/// Used by the fixed-wing mixer to address optional flap and second-aileron
/// inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RcChannel {
    Roll,
    Pitch,
    Yaw,
    Throttle,
    Aux1,
    Aux2,
    Aux3,
    Aux4,
}

impl RcChannel {
    /// Look up a channel from its zero-based index
    ///
    /// Index order follows the receiver map: roll, pitch, yaw, throttle, aux1..aux4.
    /// Returns `None` for anything out of range (the "no channel" sentinel).
    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(RcChannel::Roll),
            1 => Some(RcChannel::Pitch),
            2 => Some(RcChannel::Yaw),
            3 => Some(RcChannel::Throttle),
            4 => Some(RcChannel::Aux1),
            5 => Some(RcChannel::Aux2),
            6 => Some(RcChannel::Aux3),
            7 => Some(RcChannel::Aux4),
            _ => None,
        }
    }
}

/// Pilot demand for one control cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlDemand {
    /// Throttle pulse width (μs)
    pub throttle: i16,
    /// Centered roll command
    pub roll: i16,
    /// Centered pitch command
    pub pitch: i16,
    /// Centered yaw command
    pub yaw: i16,
    /// Raw auxiliary channel pulse widths (μs)
    pub aux: [u16; AUX_CHANNELS],
}

impl Default for ControlDemand {
    fn default() -> Self {
        Self {
            throttle: DEFAULT_THROTTLE_OFFSET as i16,
            roll: 0,
            pitch: 0,
            yaw: 0,
            aux: [DEFAULT_MID_RC; AUX_CHANNELS],
        }
    }
}

impl ControlDemand {
    /// Centered command for any channel
    ///
    /// Stick axes are already centered. Throttle and auxiliary channels are
    /// raw pulse widths and get `mid_rc` subtracted.
    pub fn command(&self, channel: RcChannel, mid_rc: u16) -> i16 {
        let mid = mid_rc as i16;
        match channel {
            RcChannel::Roll => self.roll,
            RcChannel::Pitch => self.pitch,
            RcChannel::Yaw => self.yaw,
            RcChannel::Throttle => self.throttle.saturating_sub(mid),
            RcChannel::Aux1 => self.aux_centered(0, mid_rc),
            RcChannel::Aux2 => self.aux_centered(1, mid_rc),
            RcChannel::Aux3 => self.aux_centered(2, mid_rc),
            RcChannel::Aux4 => self.aux_centered(3, mid_rc),
        }
    }

    /// Auxiliary channel minus `mid_rc`
    pub fn aux_centered(&self, index: usize, mid_rc: u16) -> i16 {
        self.aux[index] as i16 - mid_rc as i16
    }
}

/// Per-axis correction from the stabilization loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StabilizationCorrection {
    pub roll: i16,
    pub pitch: i16,
    pub yaw: i16,
}

/// Vehicle attitude in decidegrees
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttitudeAngles {
    pub roll: i16,
    pub pitch: i16,
}

/// Number of samples averaged into a throttle zero offset
pub const ZERO_OFFSET_SAMPLES: u8 = 8;

/// Throttle zero-offset calibration
///
/// Sums eight raw throttle samples and divides by shifting (`>> 3`). The
/// result is the offset subtracted from the raw throttle channel to get the
/// monopolar throttle used by the output safety gate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroOffsetCalibrator {
    sum: u32,
    samples: u8,
}

impl ZeroOffsetCalibrator {
    /// Create an empty calibrator
    pub const fn new() -> Self {
        Self { sum: 0, samples: 0 }
    }

    /// Feed one raw throttle sample
    ///
    /// Returns the averaged offset once the eighth sample arrives, `None`
    /// before that. Samples past the eighth are ignored.
    pub fn push(&mut self, raw_us: u16) -> Option<u16> {
        if self.samples >= ZERO_OFFSET_SAMPLES {
            return self.offset();
        }
        self.sum += raw_us as u32;
        self.samples += 1;
        self.offset()
    }

    /// Averaged offset, if calibration finished
    pub fn offset(&self) -> Option<u16> {
        if self.samples >= ZERO_OFFSET_SAMPLES {
            Some((self.sum >> 3) as u16)
        } else {
            None
        }
    }

    /// Discard collected samples
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
