//! Mock PWM implementation for testing

use crate::platform::{
    Result,
    error::{PlatformError, PwmError},
    traits::{pulse_to_duty_cycle, PwmConfig, PwmInterface},
};

/// Duty cycle writes remembered by the mock
const HISTORY_LEN: usize = 32;

/// Mock PWM output
///
/// Stores the duty cycle like a duty-only driver, so pulses go through the
/// trait's default conversion. Keeps the most recent writes for inspection.
#[derive(Debug)]
pub struct MockPwm {
    duty_cycle: f32,
    frequency: u32,
    enabled: bool,
    writes: heapless::Vec<f32, HISTORY_LEN>,
    fail_writes: bool,
}

impl MockPwm {
    /// Create a new mock PWM
    pub fn new(config: PwmConfig) -> Self {
        Self {
            duty_cycle: pulse_to_duty_cycle(config.pulse_us, config.frequency),
            frequency: config.frequency,
            enabled: false,
            writes: heapless::Vec::new(),
            fail_writes: false,
        }
    }

    /// Number of duty-cycle writes since creation (saturates at the history size)
    pub fn write_count(&self) -> usize {
        self.writes.len()
    }

    /// Make every following duty-cycle write fail with `ChannelUnavailable`
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl PwmInterface for MockPwm {
    fn set_duty_cycle(&mut self, duty_cycle: f32) -> Result<()> {
        if self.fail_writes {
            return Err(PlatformError::Pwm(PwmError::ChannelUnavailable));
        }
        if !(0.0..=1.0).contains(&duty_cycle) {
            return Err(PlatformError::Pwm(PwmError::InvalidDutyCycle));
        }
        self.duty_cycle = duty_cycle;
        let _ = self.writes.push(duty_cycle);
        Ok(())
    }

    fn duty_cycle(&self) -> f32 {
        self.duty_cycle
    }

    fn set_frequency(&mut self, frequency: u32) -> Result<()> {
        if frequency == 0 {
            return Err(PlatformError::Pwm(PwmError::InvalidFrequency));
        }
        self.frequency = frequency;
        Ok(())
    }

    fn frequency(&self) -> u32 {
        self.frequency
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_pwm_duty_cycle() {
        let mut pwm = MockPwm::new(PwmConfig::default());
        assert_eq!(pwm.duty_cycle(), 0.0);

        pwm.set_duty_cycle(0.5).unwrap();
        assert_eq!(pwm.duty_cycle(), 0.5);
        assert_eq!(pwm.write_count(), 1);

        assert!(pwm.set_duty_cycle(-0.1).is_err());
        assert!(pwm.set_duty_cycle(1.1).is_err());
        assert_eq!(pwm.write_count(), 1);
    }

    #[test]
    fn test_mock_pwm_pulse_width() {
        let mut pwm = MockPwm::new(PwmConfig::default());
        pwm.set_pulse_us(1000).unwrap();
        assert!((pwm.duty_cycle() - 0.05).abs() < 1e-6);
        assert_eq!(pwm.pulse_us(), 1000);

        pwm.set_frequency(400).unwrap();
        pwm.set_duty_cycle(0.5).unwrap();
        assert_eq!(pwm.pulse_us(), 1250);
    }

    #[test]
    fn test_mock_pwm_initial_pulse() {
        let pwm = MockPwm::new(PwmConfig {
            frequency: 50,
            pulse_us: 1000,
        });
        assert_eq!(pwm.pulse_us(), 1000);
        assert_eq!(pwm.write_count(), 0);
    }

    #[test]
    fn test_mock_pwm_frequency() {
        let mut pwm = MockPwm::new(PwmConfig::default());
        assert_eq!(pwm.frequency(), 50);

        pwm.set_frequency(100).unwrap();
        assert_eq!(pwm.frequency(), 100);
        assert!(pwm.set_frequency(0).is_err());
    }

    #[test]
    fn test_mock_pwm_enable() {
        let mut pwm = MockPwm::new(PwmConfig::default());
        assert!(!pwm.is_enabled());

        pwm.enable();
        assert!(pwm.is_enabled());

        pwm.disable();
        assert!(!pwm.is_enabled());
    }

    #[test]
    fn test_mock_pwm_injected_failure() {
        let mut pwm = MockPwm::new(PwmConfig::default());
        pwm.fail_writes(true);
        assert_eq!(
            pwm.set_duty_cycle(0.05),
            Err(PlatformError::Pwm(PwmError::ChannelUnavailable))
        );
        assert_eq!(pwm.duty_cycle(), 0.0);
    }
}
