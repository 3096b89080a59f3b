//! Fixed-wing surface mixer
//!
//! Mixes aileron, flap, rudder and elevator surfaces for a conventional
//! airplane. Throttle is copied straight through to both motor outputs.
//!
//! # Flap modes
//!
//! - [`FlapMode::Basic`]: one aileron channel drives both sides, flap from an
//!   optional flap channel
//! - [`FlapMode::Premixed`]: flaperons mixed in the transmitter; a second
//!   aileron channel carries the right side, flap is read only when both a
//!   second aileron and a flap channel exist
//! - [`FlapMode::Advanced`]: independent ailerons plus a separate flap channel
//!
//! # Servo slots
//!
//! | Slot | Surface |
//! |------|---------|
//! | 0 | Left aileron / flaperon |
//! | 1 | Right aileron / flaperon |
//! | 2 | Rudder |
//! | 3 | Elevator |
//! | 4 | Rate-limited flap |

use super::servo::{ServoLimits, MAX_SERVOS};
use crate::rc::{ControlDemand, RcChannel, StabilizationCorrection};

/// How aileron and flap demand are decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlapMode {
    Basic,
    Premixed,
    Advanced,
}

impl FlapMode {
    /// Look up a mode from its persisted index
    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(FlapMode::Basic),
            1 => Some(FlapMode::Premixed),
            2 => Some(FlapMode::Advanced),
            _ => None,
        }
    }
}

/// Fixed-wing tunables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedWingSettings {
    pub flap_mode: FlapMode,
    /// Cycles between flap steps, 0 snaps flaps to demand
    pub flap_speed: u8,
    /// Largest flap step per allowed cycle
    pub flap_step: u8,
    /// Dedicated flap input
    pub flap_channel: Option<RcChannel>,
    /// Right aileron input for dual-aileron setups
    pub aileron2_channel: Option<RcChannel>,
    /// +1 or -1 applied to the flap before it is mixed into the ailerons
    pub flap_direction: i8,
}

impl Default for FixedWingSettings {
    fn default() -> Self {
        Self {
            flap_mode: FlapMode::Basic,
            flap_speed: 0,
            flap_step: 3,
            flap_channel: None,
            aileron2_channel: None,
            flap_direction: 1,
        }
    }
}

/// Rate-limited flap position carried across cycles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlapActuatorState {
    /// Current commanded flap position (centered)
    pub position: i16,
    /// Cycle-skip counter, wraps after `flap_speed`
    pub skip: u8,
}

impl FlapActuatorState {
    pub const fn new() -> Self {
        Self {
            position: 0,
            skip: 0,
        }
    }

    /// Move one cycle toward `demand`
    ///
    /// With `speed == 0` the position snaps to demand. Otherwise it moves by
    /// `step` (or by 1 once closer than `step`) only on the cycle where the
    /// skip counter equals `speed`.
    pub fn advance(&mut self, demand: i16, speed: u8, step: u8) -> i16 {
        if speed != 0 {
            let distance = (self.position as i32 - demand as i32).abs();
            let delta = if distance >= step as i32 { step as i16 } else { 1 };

            if self.skip == speed {
                if self.position < demand {
                    self.position += delta;
                } else if self.position > demand {
                    self.position -= delta;
                }
            }
        } else {
            self.position = demand;
        }

        self.skip = if self.skip >= speed { 0 } else { self.skip + 1 };
        self.position
    }
}

/// Motor and surface outputs of one fixed-wing cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedWingOutput {
    /// Throttle copied to both motors
    pub motors: [i16; 2],
    /// Surface pulse widths by servo slot
    pub servos: [i16; MAX_SERVOS],
}

/// Fixed-wing mixer with its flap state
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedWingMixer {
    flap: FlapActuatorState,
}

impl FixedWingMixer {
    pub const fn new() -> Self {
        Self {
            flap: FlapActuatorState::new(),
        }
    }

    /// Flap actuator state
    pub fn flap(&self) -> &FlapActuatorState {
        &self.flap
    }

    /// Run one cycle
    ///
    /// # Arguments
    ///
    /// * `settings` - Flap mode and rate limits
    /// * `mid_rc` - Receiver mid-point, used to center flap/aileron channels
    /// * `demand` - Pilot demand
    /// * `correction` - Stabilization correction, ignored in pass-through
    /// * `passthrough` - Pass-through flight mode
    /// * `limits` - Reversal, center and endpoints per servo slot
    pub fn mix(
        &mut self,
        settings: &FixedWingSettings,
        mid_rc: u16,
        demand: &ControlDemand,
        correction: &StabilizationCorrection,
        passthrough: bool,
        limits: &[ServoLimits; MAX_SERVOS],
    ) -> FixedWingOutput {
        let command = |channel: Option<RcChannel>| channel.map(|ch| demand.command(ch, mid_rc));

        let left_roll = demand.roll;
        let (right_roll, flap_demand) = match settings.flap_mode {
            FlapMode::Basic => (left_roll, command(settings.flap_channel).unwrap_or(0)),
            FlapMode::Premixed => match command(settings.aileron2_channel) {
                Some(right) => (right, command(settings.flap_channel).unwrap_or(0)),
                None => (left_roll, 0),
            },
            FlapMode::Advanced => (
                command(settings.aileron2_channel).unwrap_or(left_roll),
                command(settings.flap_channel).unwrap_or(0),
            ),
        };

        let slow_flaps = self
            .flap
            .advance(flap_demand, settings.flap_speed, settings.flap_step);
        let flaperons = slow_flaps as i32 * settings.flap_direction as i32;

        let mut surfaces = [0i32; MAX_SERVOS];
        surfaces[0] = left_roll as i32 + flaperons;
        surfaces[1] = right_roll as i32 - flaperons;
        surfaces[2] = demand.yaw as i32;
        surfaces[3] = demand.pitch as i32;
        surfaces[4] = flaperons;

        if !passthrough {
            surfaces[0] -= correction.roll as i32;
            surfaces[1] -= correction.roll as i32;
            surfaces[2] -= correction.yaw as i32;
            surfaces[3] += correction.pitch as i32;
        }

        let mut servos = [0i16; MAX_SERVOS];
        for (slot, servo) in servos.iter_mut().enumerate() {
            *servo = limits[slot].apply(surfaces[slot]);
        }

        FixedWingOutput {
            motors: [demand.throttle; 2],
            servos,
        }
    }
}
