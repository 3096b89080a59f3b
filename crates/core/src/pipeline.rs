//! Full actuation cycle
//!
//! Mix engine, channel routing, output scaling and the buffer handoff, run
//! once per control cycle by the control task.

use crate::mixer::{MixEngine, MixFault, MixInputs, MixerConfiguration, MixerSettings};
use crate::output::{
    ChannelMap, GateDecision, OutputBuffer, OutputFrame, OutputScaler, ThrottleSample,
};
use crate::rc::{ZeroOffsetCalibrator, DEFAULT_THROTTLE_OFFSET};

/// Outcome of one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    /// A new frame reached the output buffer
    pub published: bool,
    /// Motor channels were forced to the minimum pulse
    pub motors_locked: bool,
    /// Mixer fault for this cycle
    pub fault: Option<MixFault>,
}

/// Mixer plus output stage for one vehicle
pub struct ActuationPipeline {
    engine: MixEngine,
    channels: ChannelMap,
    scaler: OutputScaler,
    calibrator: ZeroOffsetCalibrator,
    throttle_offset: u16,
}

impl ActuationPipeline {
    /// Assemble a pipeline from validated configuration
    pub fn new(config: MixerConfiguration, settings: MixerSettings, channels: ChannelMap) -> Self {
        let servo_limits = channels.servo_limits(settings.mid_rc);
        let scaler = OutputScaler::new(channels.roles(), channels.motor_min_pulse());
        Self {
            engine: MixEngine::new(config, settings, servo_limits),
            channels,
            scaler,
            calibrator: ZeroOffsetCalibrator::new(),
            throttle_offset: DEFAULT_THROTTLE_OFFSET,
        }
    }

    pub fn engine(&self) -> &MixEngine {
        &self.engine
    }

    pub fn channels(&self) -> &ChannelMap {
        &self.channels
    }

    /// Zero offset subtracted from the raw throttle (μs)
    pub fn throttle_offset(&self) -> u16 {
        self.throttle_offset
    }

    /// Feed one raw throttle sample into the zero-offset calibration
    ///
    /// Returns the new offset once enough samples arrived.
    pub fn calibrate_throttle(&mut self, raw_us: u16) -> Option<u16> {
        let offset = self.calibrator.push(raw_us)?;
        self.throttle_offset = offset;
        Some(offset)
    }

    /// Mix, scale, gate and publish one cycle
    pub fn run_cycle(&mut self, inputs: &MixInputs, buffer: &OutputBuffer) -> CycleReport {
        let mix = self.engine.mix(inputs);
        let mut frame = self.channels.compose(&mix);

        let throttle = ThrottleSample {
            raw: inputs.demand.throttle,
            zero_offset: self.throttle_offset,
        };

        match self
            .scaler
            .process(&mut frame, throttle, &inputs.arming, inputs.safety)
        {
            GateDecision::Publish { motors_locked } => {
                buffer.publish(&frame);
                CycleReport {
                    published: true,
                    motors_locked,
                    fault: mix.fault,
                }
            }
            GateDecision::Hold => CycleReport {
                published: false,
                motors_locked: false,
                fault: mix.fault,
            },
        }
    }

    /// Publish a frame with every motor at `pulse_us`
    ///
    /// Servo channels keep their last mixed position. Bypasses the arming
    /// gate; only for ESC calibration or the initial disarmed frame.
    pub fn write_all_motors(&self, pulse_us: i16, buffer: &OutputBuffer) -> OutputFrame {
        let mix = self.engine.all_motors(pulse_us);
        let mut frame = self.channels.compose(&mix);
        self.scaler.rescale(&mut frame);
        buffer.publish(&frame);
        frame
    }
}
