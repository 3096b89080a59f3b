//! Full-cycle actuation tests on host
//!
//! Parameters → pipeline → control loop → output buffer → PWM, using the
//! public API only.

use aero_mix::core::config::{load_pipeline, register_parameters};
use aero_mix::core::scheduler::ControlLoop;
use aero_mix::core::traits::{MockState, SharedState};
use aero_mix::libraries::ServoOutputs;
use aero_mix::mixing::arming::{ArmingState, SafetyFlags};
use aero_mix::mixing::mixer::{Airframe, CustomMixer, MixFault, MixInputs, MixerConfiguration};
use aero_mix::mixing::output::OutputBuffer;
use aero_mix::mixing::parameters::{CustomMixerParams, ParamValue, ParameterStore};
use aero_mix::mixing::rc::StabilizationCorrection;
use aero_mix::platform::{PwmInterface, Result};

/// Pulse-native output that records what it was asked to drive
struct RecordingPwm {
    pulse_us: u16,
    duty_writes: usize,
    enabled: bool,
}

impl RecordingPwm {
    fn new() -> Self {
        Self {
            pulse_us: 0,
            duty_writes: 0,
            enabled: false,
        }
    }
}

impl PwmInterface for RecordingPwm {
    fn set_pulse_us(&mut self, pulse_us: u16) -> Result<()> {
        self.pulse_us = pulse_us;
        Ok(())
    }

    fn pulse_us(&self) -> u16 {
        self.pulse_us
    }

    fn set_duty_cycle(&mut self, duty_cycle: f32) -> Result<()> {
        self.duty_writes += 1;
        self.pulse_us = (duty_cycle * 20_000.0 + 0.5) as u16;
        Ok(())
    }

    fn duty_cycle(&self) -> f32 {
        self.pulse_us as f32 / 20_000.0
    }

    fn set_frequency(&mut self, _frequency: u32) -> Result<()> {
        Ok(())
    }

    fn frequency(&self) -> u32 {
        50
    }

    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

fn store_for(frame: Airframe) -> ParameterStore {
    let mut store = ParameterStore::new();
    register_parameters(&mut store).unwrap();
    store
        .set("MIX_FRAME", ParamValue::Int(frame.index() as i32))
        .unwrap();
    store
}

fn control_for(store: &ParameterStore) -> ControlLoop {
    ControlLoop::new(load_pipeline(store).unwrap())
}

fn inputs(throttle: i16, armed: bool) -> MockState<MixInputs> {
    let mut inputs = MixInputs::default();
    inputs.demand.throttle = throttle;
    inputs.arming = if armed {
        ArmingState::armed()
    } else {
        ArmingState::default()
    };
    MockState::new(inputs)
}

#[test]
fn quad_x_level_throttle_drives_equal_motors() {
    let mut control = control_for(&store_for(Airframe::QuadX));
    let inputs = inputs(1400, true);
    let buffer = OutputBuffer::new();

    let report = control.step(&inputs, &buffer);
    assert!(report.published);
    assert!(!report.motors_locked);

    let pulses = buffer.try_read().unwrap().frame.pulses;
    assert_eq!(&pulses[..4], &[1400; 4]);
}

#[test]
fn quad_x_roll_correction_splits_sides() {
    let mut control = control_for(&store_for(Airframe::QuadX));
    let inputs = inputs(1500, true);
    inputs.with_mut(|i| {
        i.correction = StabilizationCorrection {
            roll: 40,
            pitch: 0,
            yaw: 0,
        }
    });
    let buffer = OutputBuffer::new();

    control.step(&inputs, &buffer);
    let pulses = buffer.try_read().unwrap().frame.pulses;
    assert_eq!(&pulses[..4], &[1460, 1460, 1540, 1540]);
}

#[test]
fn tricopter_yaw_correction_moves_tail_servo() {
    let mut control = control_for(&store_for(Airframe::Tricopter));
    let inputs = inputs(1500, true);
    inputs.with_mut(|i| i.correction.yaw = 50);
    let buffer = OutputBuffer::new();

    control.step(&inputs, &buffer);
    let pulses = buffer.try_read().unwrap().frame.pulses;
    // SERVO5 carries servo output 0, the tail
    assert_eq!(pulses[4], 1550);
    // Fourth motor channel has no motor on a tricopter
    assert_eq!(pulses[3], 1000);
}

#[test]
fn disarmed_locks_motors_but_not_servos() {
    let mut control = control_for(&store_for(Airframe::Tricopter));
    let inputs = inputs(1700, false);
    inputs.with_mut(|i| i.correction.yaw = -80);
    let buffer = OutputBuffer::new();

    let report = control.step(&inputs, &buffer);
    assert!(report.motors_locked);

    let pulses = buffer.try_read().unwrap().frame.pulses;
    assert_eq!(&pulses[..4], &[1000; 4]);
    assert_eq!(pulses[4], 1420);
}

#[test]
fn throttle_below_idle_locks_motors() {
    let mut control = control_for(&store_for(Airframe::QuadX));
    let inputs = inputs(1030, true);
    let buffer = OutputBuffer::new();

    let report = control.step(&inputs, &buffer);
    assert!(report.motors_locked);
    assert_eq!(&buffer.try_read().unwrap().frame.pulses[..4], &[1000; 4]);
}

#[test]
fn throttle_high_flag_keeps_previous_buffer() {
    let mut control = control_for(&store_for(Airframe::QuadX));
    let inputs = inputs(1500, true);
    let buffer = OutputBuffer::new();

    control.step(&inputs, &buffer);
    let before = buffer.try_read().unwrap();

    inputs.with_mut(|i| {
        i.demand.throttle = 1900;
        i.correction.roll = 200;
        i.safety = SafetyFlags::THROTTLE_HIGH;
    });
    let report = control.step(&inputs, &buffer);

    assert!(!report.published);
    assert_eq!(buffer.try_read().unwrap(), before);
}

#[test]
fn servo_endpoints_bound_every_output() {
    let mut store = store_for(Airframe::Tricopter);
    store.set("SERVO5_MIN", ParamValue::Int(1400)).unwrap();
    store.set("SERVO5_MAX", ParamValue::Int(1600)).unwrap();
    let mut control = control_for(&store);
    let inputs = inputs(1500, true);
    let buffer = OutputBuffer::new();

    for yaw in [-400, -120, 0, 90, 400] {
        inputs.with_mut(|i| i.correction.yaw = yaw);
        control.step(&inputs, &buffer);
        let tail = buffer.try_read().unwrap().frame.pulses[4];
        assert!((1400..=1600).contains(&tail), "yaw {} gave {}", yaw, tail);
    }
}

#[test]
fn helicopter_frame_faults_every_cycle() {
    let mut control = control_for(&store_for(Airframe::Heli120Ccpm));
    let inputs = inputs(1600, true);
    let buffer = OutputBuffer::new();

    for _ in 0..3 {
        let report = control.step(&inputs, &buffer);
        assert_eq!(
            report.fault,
            Some(MixFault::NoMixer {
                airframe: Airframe::Heli120Ccpm
            })
        );
        assert_eq!(&buffer.try_read().unwrap().frame.pulses[..4], &[1000; 4]);
    }
}

#[test]
fn catalog_seeded_custom_table_matches_catalog() {
    for (index, airframe) in Airframe::ALL.iter().enumerate() {
        if airframe.profile().kind.matrix().is_none() {
            continue;
        }

        let mut store = store_for(Airframe::Custom);
        let mut custom = CustomMixer::new();
        assert_eq!(custom.load_from_catalog(index).unwrap(), *airframe);
        CustomMixerParams::save(&custom, &mut store).unwrap();

        let loaded = load_pipeline(&store).unwrap();
        let resolved = loaded.engine().config();
        let catalog = MixerConfiguration::resolve(
            airframe.index() as i32,
            &CustomMixer::new(),
            Default::default(),
        )
        .unwrap();

        assert_eq!(resolved.motor_count(), catalog.motor_count(), "{}", airframe.name());
        assert_eq!(resolved.rules(), catalog.rules(), "{}", airframe.name());
    }
}

#[test]
fn published_frames_reach_pwm_outputs() {
    let mut control = control_for(&store_for(Airframe::QuadX));
    let inputs = inputs(1300, true);
    let buffer = OutputBuffer::new();

    let mut motor = RecordingPwm::new();
    let mut servo = RecordingPwm::new();
    let mut outputs = ServoOutputs::new([
        Some(&mut motor),
        None,
        None,
        None,
        Some(&mut servo),
        None,
        None,
        None,
    ]);

    assert_eq!(outputs.service(&buffer), Ok(false));
    control.publish_idle(&buffer);
    assert_eq!(outputs.service(&buffer), Ok(true));
    outputs.enable();

    control.step(&inputs, &buffer);
    assert_eq!(outputs.service(&buffer), Ok(true));
    assert_eq!(outputs.service(&buffer), Ok(false));
    drop(outputs);

    assert!(motor.is_enabled());
    assert_eq!(motor.pulse_us(), 1300);
    assert_eq!(servo.pulse_us(), 1500);
    // Frames reach the outputs as microseconds, never as duty cycles
    assert_eq!(motor.duty_writes + servo.duty_writes, 0);
}
