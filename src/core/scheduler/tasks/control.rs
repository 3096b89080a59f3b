//! Control Loop Task
//!
//! Embassy async task that runs the actuation pipeline once per control
//! cycle.
//!
//! ## Responsibilities
//!
//! - Publish an all-motors-minimum frame before anything else
//! - Calibrate the throttle zero offset from the first raw samples
//! - Run mix, scale, gate and publish every cycle
//! - Log mixer faults and output holds when they start and stop
//!
//! ## Integration
//!
//! This task requires:
//! - A pipeline built by [`load_pipeline`](crate::core::config::load_pipeline)
//! - Shared [`MixInputs`] kept current by the RC, attitude and arming tasks
//! - The [`OutputBuffer`] serviced by the output task

use aero_mix_core::mixer::{MixFault, MixInputs};
use aero_mix_core::output::{OutputBuffer, OutputFrame};
use aero_mix_core::{ActuationPipeline, CycleReport};

use crate::core::traits::SharedState;

#[cfg(feature = "pico2_w")]
use crate::core::traits::EmbassyState;
#[cfg(feature = "pico2_w")]
use embassy_time::{Duration, Ticker};

/// Control cycle rate
pub const CONTROL_RATE_HZ: u64 = 250;

/// Pipeline plus the state needed to log transitions once
pub struct ControlLoop {
    pipeline: ActuationPipeline,
    last_fault: Option<MixFault>,
    holding: bool,
    cycles: u32,
}

impl ControlLoop {
    pub fn new(pipeline: ActuationPipeline) -> Self {
        Self {
            pipeline,
            last_fault: None,
            holding: false,
            cycles: 0,
        }
    }

    pub fn pipeline(&self) -> &ActuationPipeline {
        &self.pipeline
    }

    /// Completed cycles (wraps)
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    /// Publish every motor at the minimum command
    ///
    /// Used once at startup so the pulse generator never sees an empty
    /// buffer once outputs are enabled.
    pub fn publish_idle(&self, buffer: &OutputBuffer) -> OutputFrame {
        let min_command = self.pipeline.engine().settings().throttle.min_command;
        crate::log_debug!("Publishing idle frame at {} us", min_command);
        self.pipeline.write_all_motors(min_command, buffer)
    }

    /// Feed the current raw throttle into zero-offset calibration
    ///
    /// Returns the offset once calibration completes.
    pub fn calibrate<S: SharedState<MixInputs>>(&mut self, inputs: &S) -> Option<u16> {
        let raw = inputs.with(|i| i.demand.throttle);
        let offset = self.pipeline.calibrate_throttle(raw.max(0) as u16)?;
        crate::log_info!("Throttle zero offset calibrated: {} us", offset);
        Some(offset)
    }

    /// Run one control cycle on a snapshot of the shared inputs
    pub fn step<S: SharedState<MixInputs>>(
        &mut self,
        inputs: &S,
        buffer: &OutputBuffer,
    ) -> CycleReport {
        let snapshot = inputs.with(|i| *i);
        let report = self.pipeline.run_cycle(&snapshot, buffer);
        self.cycles = self.cycles.wrapping_add(1);
        self.observe(&report);
        report
    }

    fn observe(&mut self, report: &CycleReport) {
        if report.fault != self.last_fault {
            match report.fault {
                Some(MixFault::NoMixer { airframe }) => {
                    crate::log_warn!(
                        "No mixer for {}: motors at minimum, servos held",
                        airframe.name()
                    );
                }
                None => crate::log_info!("Mixer fault cleared"),
            }
            self.last_fault = report.fault;
        }

        let holding = !report.published;
        if holding != self.holding {
            if holding {
                crate::log_warn!("Outputs held: throttle high at startup");
            } else {
                crate::log_info!("Outputs released");
            }
            self.holding = holding;
        }
    }
}

/// Control loop task
///
/// # Arguments
///
/// * `control` - Control loop wrapping a loaded pipeline
/// * `inputs` - Inputs written by the RC, attitude and arming tasks
/// * `buffer` - Buffer read by the output task
///
/// # Example
///
/// ```rust,ignore
/// static INPUTS: EmbassyState<MixInputs> = EmbassyState::new(...);
/// static OUTPUTS: OutputBuffer = OutputBuffer::new();
///
/// let pipeline = load_pipeline(&store)?;
/// spawner.spawn(control_loop_task(ControlLoop::new(pipeline), &INPUTS, &OUTPUTS)).unwrap();
/// ```
#[cfg(feature = "pico2_w")]
#[embassy_executor::task]
pub async fn control_loop_task(
    mut control: ControlLoop,
    inputs: &'static EmbassyState<MixInputs>,
    buffer: &'static OutputBuffer,
) {
    crate::log_info!("Control loop task started");
    crate::log_info!(
        "  Airframe: {}",
        control.pipeline().engine().config().airframe().name()
    );

    let mut ticker = Ticker::every(Duration::from_hz(CONTROL_RATE_HZ));

    control.publish_idle(buffer);
    while control.calibrate(inputs).is_none() {
        ticker.next().await;
    }

    loop {
        control.step(inputs, buffer);
        ticker.next().await;
    }
}
