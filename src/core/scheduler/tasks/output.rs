//! Pulse Output Task
//!
//! Copies published frames from the output buffer to the PWM outputs at the
//! servo frame rate. Reads never wait on the control task: a frame caught
//! mid-update is skipped and the hardware keeps its previous pulses.

#[cfg(feature = "pico2_w")]
use crate::core::logging::display;
#[cfg(feature = "pico2_w")]
use crate::libraries::ServoOutputs;
#[cfg(feature = "pico2_w")]
use aero_mix_core::output::OutputBuffer;
#[cfg(feature = "pico2_w")]
use embassy_time::{Duration, Ticker};

/// Output refresh rate, one check per servo frame
pub const OUTPUT_RATE_HZ: u64 = 50;

/// Pulse output task
///
/// Enables the outputs once the first frame has been applied, so no output
/// ever starts from an unset duty cycle.
#[cfg(feature = "pico2_w")]
#[embassy_executor::task]
pub async fn output_task(mut outputs: ServoOutputs<'static>, buffer: &'static OutputBuffer) {
    crate::log_info!("Output task started");

    let mut ticker = Ticker::every(Duration::from_hz(OUTPUT_RATE_HZ));
    let mut enabled = false;
    let mut failing = false;

    loop {
        match outputs.service(buffer) {
            Ok(applied) => {
                if applied && !enabled {
                    outputs.enable();
                    enabled = true;
                    crate::log_info!("PWM outputs enabled");
                }
                if failing {
                    crate::log_info!("PWM output recovered");
                    failing = false;
                }
            }
            Err(e) => {
                if !failing {
                    crate::log_error!("PWM output failed: {}", display(&e).as_str());
                    failing = true;
                }
            }
        }

        ticker.next().await;
    }
}
