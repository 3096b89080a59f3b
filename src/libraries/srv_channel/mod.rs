//! Pulse output stage
//!
//! Copies gated frames from the [`OutputBuffer`] onto PWM hardware:
//! - Reads never block; an in-flight update leaves the previous pulses running
//! - Each frame is applied at most once (tracked by generation)
//! - Pulse widths go to each output as microseconds; outputs that only
//!   take a duty cycle convert at their own frame rate
//!
//! ## Safety
//!
//! **CRITICAL**: This stage applies frames exactly as published. Motor
//! locking and the throttle floor happen before publish, in the pipeline's
//! output scaler; nothing here may substitute its own values.

use aero_mix_core::output::{OutputBuffer, OutputSnapshot, MAX_OUTPUTS};

use crate::platform::{PwmInterface, Result};

/// PWM outputs fed from the output buffer
///
/// Output `n` of the buffer drives `channels[n]`; `None` leaves an output
/// unwired.
pub struct ServoOutputs<'a> {
    channels: [Option<&'a mut dyn PwmInterface>; MAX_OUTPUTS],
    last_generation: Option<u32>,
}

impl<'a> ServoOutputs<'a> {
    /// Create the output stage
    ///
    /// Outputs stay disabled until [`enable`](Self::enable); the first frame
    /// should be published before that.
    pub fn new(channels: [Option<&'a mut dyn PwmInterface>; MAX_OUTPUTS]) -> Self {
        Self {
            channels,
            last_generation: None,
        }
    }

    /// Enable every wired output
    pub fn enable(&mut self) {
        for pwm in self.channels.iter_mut().flatten() {
            pwm.enable();
        }
    }

    /// Disable every wired output
    pub fn disable(&mut self) {
        for pwm in self.channels.iter_mut().flatten() {
            pwm.disable();
        }
    }

    /// Generation of the last applied frame
    pub fn last_generation(&self) -> Option<u32> {
        self.last_generation
    }

    /// Apply the latest frame if one is ready
    ///
    /// Returns `Ok(true)` when a new frame reached the hardware, `Ok(false)`
    /// when nothing new was published or an update was in flight.
    ///
    /// # Errors
    ///
    /// Returns the first PWM error. Outputs before the failing one already
    /// carry the new frame; the frame is retried on the next call.
    pub fn service(&mut self, buffer: &OutputBuffer) -> Result<bool> {
        let Some(snapshot) = buffer.try_read() else {
            return Ok(false);
        };
        if self.last_generation == Some(snapshot.generation) {
            return Ok(false);
        }

        self.apply(&snapshot)?;
        self.last_generation = Some(snapshot.generation);
        Ok(true)
    }

    fn apply(&mut self, snapshot: &OutputSnapshot) -> Result<()> {
        for (channel, &pulse) in self.channels.iter_mut().zip(snapshot.frame.pulses.iter()) {
            if let Some(pwm) = channel {
                pwm.set_pulse_us(pulse)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockPwm;
    use crate::platform::{PlatformError, PwmConfig, PwmError};
    use aero_mix_core::output::OutputFrame;

    fn frame(pulses: [u16; MAX_OUTPUTS]) -> OutputFrame {
        OutputFrame { pulses }
    }

    fn single(pwm: &mut MockPwm) -> ServoOutputs<'_> {
        ServoOutputs::new([Some(pwm), None, None, None, None, None, None, None])
    }

    #[test]
    fn test_service_applies_published_frame() {
        let mut motor = MockPwm::new(PwmConfig::default());
        let mut servo = MockPwm::new(PwmConfig::default());
        let buffer = OutputBuffer::new();
        buffer.publish(&frame([1100, 1700, 0, 0, 0, 0, 0, 0]));

        {
            let mut outputs = ServoOutputs::new([
                Some(&mut motor),
                Some(&mut servo),
                None,
                None,
                None,
                None,
                None,
                None,
            ]);
            assert_eq!(outputs.service(&buffer), Ok(true));
            assert_eq!(outputs.last_generation(), Some(1));
        }

        assert_eq!(motor.pulse_us(), 1100);
        assert_eq!(servo.pulse_us(), 1700);
    }

    #[test]
    fn test_service_skips_unchanged_generation() {
        let mut pwm = MockPwm::new(PwmConfig::default());
        let buffer = OutputBuffer::new();
        buffer.publish(&frame([1200; MAX_OUTPUTS]));

        {
            let mut outputs = single(&mut pwm);
            assert_eq!(outputs.service(&buffer), Ok(true));
            assert_eq!(outputs.service(&buffer), Ok(false));
        }
        assert_eq!(pwm.write_count(), 1);
    }

    #[test]
    fn test_service_before_first_publish() {
        let mut pwm = MockPwm::new(PwmConfig::default());
        let buffer = OutputBuffer::new();

        let mut outputs = single(&mut pwm);
        assert_eq!(outputs.service(&buffer), Ok(false));
        assert_eq!(outputs.last_generation(), None);
    }

    #[test]
    fn test_failed_write_retried() {
        let mut pwm = MockPwm::new(PwmConfig::default());
        pwm.fail_writes(true);
        let buffer = OutputBuffer::new();
        buffer.publish(&frame([1300; MAX_OUTPUTS]));

        let mut outputs = single(&mut pwm);
        assert_eq!(
            outputs.service(&buffer),
            Err(PlatformError::Pwm(PwmError::ChannelUnavailable))
        );
        assert_eq!(outputs.last_generation(), None);
    }

    #[test]
    fn test_disabled_channel_leaves_output_low() {
        let mut pwm = MockPwm::new(PwmConfig::default());
        let buffer = OutputBuffer::new();
        buffer.publish(&frame([0; MAX_OUTPUTS]));

        single(&mut pwm).service(&buffer).unwrap();
        assert_eq!(pwm.pulse_us(), 0);
        assert_eq!(pwm.write_count(), 1);
    }

    #[test]
    fn test_enable_disable_all() {
        let mut first = MockPwm::new(PwmConfig::default());
        let mut second = MockPwm::new(PwmConfig::default());
        {
            let mut outputs = ServoOutputs::new([
                Some(&mut first),
                None,
                Some(&mut second),
                None,
                None,
                None,
                None,
                None,
            ]);
            outputs.enable();
        }
        assert!(first.is_enabled());
        assert!(second.is_enabled());
    }
}
