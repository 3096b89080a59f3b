//! Per-cycle mix engine
//!
//! Turns pilot demand and stabilization correction into motor and servo
//! pulse widths for the active airframe.
//!
//! # Cycle order
//!
//! 1. Yaw-jump guard (more than three motors)
//! 2. Linear matrix over every motor row
//! 3. Special-case airframe mixer (exactly one, chosen by [`MixerKind`])
//! 4. Camera tilt, when `SERVO_TILT` is enabled
//! 5. Motor limits and disarm override
//! 6. Servo slots routed to servo outputs, then auxiliary passthrough
//!
//! # Safety
//!
//! **CRITICAL**: Motors are forced to `min_command` whenever the vehicle is
//! disarmed, whatever the mixer produced. An airframe without a mixer
//! implementation is handled the same way and its servo outputs keep their
//! previous values.

use super::catalog::{Airframe, MixerKind, MixerRule, MAX_MOTORS};
use super::config::{FeatureFlags, GimbalFlags, MixerConfiguration, MixerSettings};
use super::fixed_wing::FixedWingMixer;
use super::flying_wing::mix_elevons;
use super::gimbal::{camera_tilt, stabilize_gimbal};
use super::servo::{ServoLimits, MAX_SERVOS};
use crate::arming::{ArmingState, SafetyFlags};
use crate::rc::{AttitudeAngles, ControlDemand, StabilizationCorrection, AUX_CHANNELS};

/// Everything the engine reads in one cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MixInputs {
    pub demand: ControlDemand,
    pub correction: StabilizationCorrection,
    pub attitude: AttitudeAngles,
    pub arming: ArmingState,
    pub safety: SafetyFlags,
    /// Pass-through flight mode: stabilization excluded from surface mixers
    pub passthrough: bool,
    /// Camera stabilization switch
    pub camstab: bool,
}

/// Cycle-level mixing fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixFault {
    /// Airframe has no mixer implementation
    NoMixer { airframe: Airframe },
}

/// Result of one mix cycle (μs)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MixOutput {
    pub motors: [i16; MAX_MOTORS],
    /// Motors in use, leading entries of `motors`
    pub motor_count: usize,
    /// Servo outputs; outputs not written this cycle keep their last value
    pub servos: [i16; MAX_SERVOS],
    pub fault: Option<MixFault>,
}

/// Yaw correction limited to `±(100 + |yaw demand|)`
pub fn limit_yaw_jump(yaw_correction: i16, yaw_demand: i16) -> i16 {
    let limit = 100 + (yaw_demand as i32).abs();
    (yaw_correction as i32).clamp(-limit, limit) as i16
}

/// Linear combination of one matrix row
pub fn mix_rule(
    rule: &MixerRule,
    throttle: i16,
    correction: &StabilizationCorrection,
    yaw_direction: i8,
) -> i16 {
    let value = throttle as f32 * rule.throttle
        + correction.pitch as f32 * rule.pitch
        + correction.roll as f32 * rule.roll
        + yaw_direction as f32 * correction.yaw as f32 * rule.yaw;
    value as i16
}

/// Mix engine for one airframe
pub struct MixEngine {
    config: MixerConfiguration,
    settings: MixerSettings,
    servo_limits: [ServoLimits; MAX_SERVOS],
    fixed_wing: FixedWingMixer,
    /// Internal servo slots, fed to outputs by the airframe's servo map
    slots: [i16; MAX_SERVOS],
    outputs: [i16; MAX_SERVOS],
}

impl MixEngine {
    /// Create an engine
    ///
    /// # Arguments
    ///
    /// * `config` - Resolved airframe mixer
    /// * `settings` - Throttle limits, special-servo ranges, gimbal and wing setup
    /// * `servo_limits` - Reversal, center and endpoints per servo output
    pub fn new(
        config: MixerConfiguration,
        settings: MixerSettings,
        servo_limits: [ServoLimits; MAX_SERVOS],
    ) -> Self {
        let mid = settings.mid_rc as i16;
        Self {
            config,
            settings,
            servo_limits,
            fixed_wing: FixedWingMixer::new(),
            slots: [mid; MAX_SERVOS],
            outputs: [mid; MAX_SERVOS],
        }
    }

    pub fn config(&self) -> &MixerConfiguration {
        &self.config
    }

    pub fn settings(&self) -> &MixerSettings {
        &self.settings
    }

    pub fn fixed_wing(&self) -> &FixedWingMixer {
        &self.fixed_wing
    }

    /// Run one cycle
    pub fn mix(&mut self, inputs: &MixInputs) -> MixOutput {
        let demand = &inputs.demand;
        let yaw_direction = self.settings.yaw_direction;
        let motor_count = self.config.motor_count();

        let mut correction = inputs.correction;
        if motor_count > 3 {
            correction.yaw = limit_yaw_jump(correction.yaw, demand.yaw);
        }

        let mut motors = [0i16; MAX_MOTORS];
        for (motor, rule) in motors.iter_mut().zip(self.config.rules()) {
            *motor = mix_rule(rule, demand.throttle, &correction, yaw_direction);
        }

        let fault = self.mix_special(inputs, &correction, &mut motors);

        if self.settings.features.contains(FeatureFlags::SERVO_TILT) {
            let tilt = camera_tilt(
                &self.settings.gimbal,
                demand,
                self.settings.mid_rc,
                &inputs.attitude,
                inputs.camstab,
            );
            self.slots[..2].copy_from_slice(&tilt);
        }

        let locked = inputs.arming.motors_locked(inputs.safety) || fault.is_some();
        self.limit_motors(&mut motors[..motor_count], demand.throttle, locked);

        if fault.is_none() {
            self.route_servos();
        }
        self.forward_aux(demand);

        MixOutput {
            motors,
            motor_count,
            servos: self.outputs,
            fault,
        }
    }

    /// Every motor at `value`, servos unchanged
    ///
    /// Used for ESC calibration and the initial disarmed frame.
    pub fn all_motors(&self, value: i16) -> MixOutput {
        let mut motors = [0i16; MAX_MOTORS];
        let motor_count = self.config.motor_count();
        motors[..motor_count].fill(value);
        MixOutput {
            motors,
            motor_count,
            servos: self.outputs,
            fault: None,
        }
    }

    fn mix_special(
        &mut self,
        inputs: &MixInputs,
        correction: &StabilizationCorrection,
        motors: &mut [i16; MAX_MOTORS],
    ) -> Option<MixFault> {
        let demand = &inputs.demand;
        let settings = &self.settings;
        let yaw = settings.yaw_direction as i32 * correction.yaw as i32;

        match self.config.kind() {
            MixerKind::Linear(_) | MixerKind::Custom => {}
            MixerKind::Bicopter(_) => {
                let middle = settings.bicopter.middle as i32;
                let pitch = correction.pitch as i32;
                self.slots[4] = settings.bicopter.clamp(middle + yaw + pitch);
                self.slots[5] = settings.bicopter.clamp(middle + yaw - pitch);
            }
            MixerKind::Tricopter(_) => {
                self.slots[5] = settings
                    .tricopter
                    .clamp(settings.tricopter.middle as i32 + yaw);
            }
            MixerKind::Gimbal => {
                let out = stabilize_gimbal(&settings.gimbal, demand, &inputs.attitude);
                self.slots[..2].copy_from_slice(&out);
            }
            MixerKind::FlyingWing => {
                motors[0] = demand.throttle;
                let out = mix_elevons(
                    &settings.elevon,
                    demand,
                    correction,
                    inputs.passthrough,
                    &self.servo_limits[0],
                    &self.servo_limits[1],
                );
                self.slots[..2].copy_from_slice(&out);
            }
            MixerKind::FixedWing => {
                let out = self.fixed_wing.mix(
                    &settings.fixed_wing,
                    settings.mid_rc,
                    demand,
                    correction,
                    inputs.passthrough,
                    &self.servo_limits,
                );
                motors[..2].copy_from_slice(&out.motors);
                self.slots = out.servos;
            }
            MixerKind::Unmixed => {
                return Some(MixFault::NoMixer {
                    airframe: self.config.airframe(),
                });
            }
        }
        None
    }

    fn limit_motors(&self, motors: &mut [i16], throttle_demand: i16, locked: bool) {
        let limits = &self.settings.throttle;
        let max_motor = motors.iter().copied().max().unwrap_or(limits.min_command);
        let excess = (max_motor as i32 - limits.max_throttle as i32).max(0);
        let motor_stop = self.settings.features.contains(FeatureFlags::MOTOR_STOP);

        for motor in motors.iter_mut() {
            let mut value = (*motor as i32 - excess)
                .clamp(limits.min_throttle as i32, limits.max_throttle as i32)
                as i16;

            if throttle_demand < limits.min_check {
                value = if motor_stop {
                    limits.min_command
                } else {
                    limits.min_throttle
                };
            }
            if locked {
                value = limits.min_command;
            }
            *motor = value;
        }
    }

    /// Slots feeding each servo output, in output order
    fn servo_map(&self) -> &'static [usize] {
        if !self.config.has_servo_outputs() {
            return &[];
        }
        match self.config.airframe() {
            Airframe::Bicopter => &[4, 5],
            Airframe::Tricopter => &[5],
            Airframe::Airplane => &[0, 1, 2, 3, 4],
            Airframe::FlyingWing | Airframe::Gimbal => &[0, 1],
            _ if self.settings.features.contains(FeatureFlags::SERVO_TILT) => &[0, 1],
            _ => &[],
        }
    }

    fn route_servos(&mut self) {
        for (output, &slot) in self.servo_map().iter().enumerate() {
            self.outputs[output] = self.slots[slot];
        }
    }

    fn forward_aux(&mut self, demand: &ControlDemand) {
        if !self.settings.gimbal.flags.contains(GimbalFlags::FORWARD_AUX) {
            return;
        }
        let offset = if self.settings.features.contains(FeatureFlags::SERVO_TILT) {
            2
        } else {
            0
        };
        for (index, &value) in demand.aux.iter().enumerate().take(AUX_CHANNELS) {
            self.outputs[offset + index] = value as i16;
        }
    }
}
