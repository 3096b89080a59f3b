//! Per-servo output limits
//!
//! Surface mixers (fixed wing, flying wing) produce centered values. The last
//! step for every surface is: multiply by the reversal sign, add the center,
//! clamp to the endpoints.

/// Maximum number of servo outputs
pub const MAX_SERVOS: usize = 8;

/// Reversal, center and endpoints of one servo output (μs)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServoLimits {
    /// +1 normal, -1 reversed
    pub direction: i8,
    pub center: i16,
    pub endpoint_low: i16,
    pub endpoint_high: i16,
}

impl ServoLimits {
    pub const fn new(direction: i8, center: i16, endpoint_low: i16, endpoint_high: i16) -> Self {
        Self {
            direction,
            center,
            endpoint_low,
            endpoint_high,
        }
    }

    /// Reverse, offset by center, clamp to endpoints
    pub fn apply(&self, centered: i32) -> i16 {
        let value = centered * self.direction as i32 + self.center as i32;
        self.clamp(value)
    }

    /// Clamp a pulse width to the endpoints
    ///
    /// Idempotent: clamping an already clamped value returns it unchanged.
    pub fn clamp(&self, value: i32) -> i16 {
        value.clamp(self.endpoint_low as i32, self.endpoint_high as i32) as i16
    }
}

impl Default for ServoLimits {
    fn default() -> Self {
        Self::new(1, 1500, 1000, 2000)
    }
}
