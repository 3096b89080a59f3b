//! Physical output channel configuration
//!
//! Each physical output is either disabled, a motor fed from a motor slot, or
//! a servo fed from a servo output. Channels are validated once when the map
//! is built; the per-cycle path assumes every channel is well formed.

use super::error::ConfigError;
use super::scaler::{encode_motor, encode_servo, OutputFrame, PULSE_MAX_US, PULSE_MIN_US};
use crate::mixer::{MixOutput, ServoLimits, MAX_MOTORS, MAX_SERVOS};

/// Number of physical output channels
pub const MAX_OUTPUTS: usize = 8;

/// Actuator kind driven by a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelRole {
    /// Speed-controlled motor (ESC)
    Motor,
    /// Positional servo
    Servo,
}

/// One physical output channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConfig {
    pub role: ChannelRole,
    /// Motor slot or servo output feeding this channel
    pub source: u8,
    /// +1 normal, -1 reversed
    pub direction: i8,
    /// Neutral pulse (μs)
    pub center: u16,
    /// Lowest pulse the actuator accepts (μs)
    pub endpoint_low: u16,
    /// Highest pulse the actuator accepts (μs)
    pub endpoint_high: u16,
}

impl ChannelConfig {
    /// Motor channel with the full 1000-2000 μs range
    pub const fn motor(source: u8) -> Self {
        Self {
            role: ChannelRole::Motor,
            source,
            direction: 1,
            center: 1000,
            endpoint_low: 1000,
            endpoint_high: 2000,
        }
    }

    /// Servo channel centered at 1500 μs
    pub const fn servo(source: u8) -> Self {
        Self {
            role: ChannelRole::Servo,
            source,
            direction: 1,
            center: 1500,
            endpoint_low: 1000,
            endpoint_high: 2000,
        }
    }

    /// Check the channel invariants
    ///
    /// # Errors
    ///
    /// - `InvertedEndpoints` if `endpoint_low > endpoint_high`
    /// - `PulseOutOfRange` if an endpoint is outside the encodable pulse range
    /// - `CenterOutOfRange` if the center lies outside the endpoints
    /// - `InvalidDirection` if direction is not ±1
    /// - `SourceOutOfRange` if the source slot does not exist for the role
    pub fn validate(&self, channel: usize) -> Result<(), ConfigError> {
        if self.endpoint_low > self.endpoint_high {
            return Err(ConfigError::InvertedEndpoints { channel });
        }
        if self.endpoint_low < PULSE_MIN_US || self.endpoint_high > PULSE_MAX_US {
            return Err(ConfigError::PulseOutOfRange { channel });
        }
        if self.center < self.endpoint_low || self.center > self.endpoint_high {
            return Err(ConfigError::CenterOutOfRange { channel });
        }
        if self.direction != 1 && self.direction != -1 {
            return Err(ConfigError::InvalidDirection { channel });
        }
        let slots = match self.role {
            ChannelRole::Motor => MAX_MOTORS,
            ChannelRole::Servo => MAX_SERVOS,
        };
        if self.source as usize >= slots {
            return Err(ConfigError::SourceOutOfRange { channel });
        }
        Ok(())
    }

    /// Clamp a pulse width to this channel's endpoints
    pub fn clamp(&self, pulse: i16) -> u16 {
        (pulse as i32).clamp(self.endpoint_low as i32, self.endpoint_high as i32) as u16
    }
}

/// Validated set of physical channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelMap {
    channels: [Option<ChannelConfig>; MAX_OUTPUTS],
    motor_min_pulse: u16,
}

impl ChannelMap {
    /// Build and validate a channel map
    ///
    /// # Arguments
    ///
    /// * `channels` - Per-output configuration, `None` for unused outputs
    /// * `motor_min_pulse` - Pulse written to motors by the safety override (μs)
    ///
    /// # Errors
    ///
    /// Returns the first channel error found, or `MinimumOutsideEndpoints` if
    /// a motor channel cannot represent `motor_min_pulse`.
    pub fn new(
        channels: [Option<ChannelConfig>; MAX_OUTPUTS],
        motor_min_pulse: u16,
    ) -> Result<Self, ConfigError> {
        for (index, channel) in channels.iter().enumerate() {
            let Some(config) = channel else {
                continue;
            };
            config.validate(index)?;
            if config.role == ChannelRole::Motor
                && (motor_min_pulse < config.endpoint_low || motor_min_pulse > config.endpoint_high)
            {
                return Err(ConfigError::MinimumOutsideEndpoints { channel: index });
            }
        }

        Ok(Self {
            channels,
            motor_min_pulse,
        })
    }

    pub fn channels(&self) -> &[Option<ChannelConfig>; MAX_OUTPUTS] {
        &self.channels
    }

    /// Pulse the safety override writes to motor channels (μs)
    pub fn motor_min_pulse(&self) -> u16 {
        self.motor_min_pulse
    }

    /// Role of each output, `None` when disabled
    pub fn roles(&self) -> [Option<ChannelRole>; MAX_OUTPUTS] {
        self.channels.map(|channel| channel.map(|c| c.role))
    }

    /// Surface limits per servo output
    ///
    /// Servo outputs without a channel use `default_center` and 1000-2000 μs.
    pub fn servo_limits(&self, default_center: u16) -> [ServoLimits; MAX_SERVOS] {
        let mut limits = [ServoLimits::new(1, default_center as i16, 1000, 2000); MAX_SERVOS];
        for config in self.channels.iter().flatten() {
            if config.role == ChannelRole::Servo {
                limits[config.source as usize] = ServoLimits::new(
                    config.direction,
                    config.center as i16,
                    config.endpoint_low as i16,
                    config.endpoint_high as i16,
                );
            }
        }
        limits
    }

    /// Route a mix result onto physical channels
    ///
    /// Each channel is clamped to its endpoints and encoded into the internal
    /// output representation. Disabled channels stay at zero.
    pub fn compose(&self, mix: &MixOutput) -> OutputFrame {
        let mut frame = OutputFrame::default();
        for (slot, channel) in frame.pulses.iter_mut().zip(self.channels.iter()) {
            let Some(config) = channel else {
                continue;
            };
            let source = config.source as usize;
            *slot = match config.role {
                ChannelRole::Motor => {
                    let pulse = if source < mix.motor_count {
                        mix.motors[source]
                    } else {
                        self.motor_min_pulse as i16
                    };
                    encode_motor(config.clamp(pulse))
                }
                ChannelRole::Servo => encode_servo(config.clamp(mix.servos[source])),
            };
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::scaler::{motor_to_pulse, servo_to_pulse};

    fn quad_with_tilt() -> [Option<ChannelConfig>; MAX_OUTPUTS] {
        [
            Some(ChannelConfig::motor(0)),
            Some(ChannelConfig::motor(1)),
            Some(ChannelConfig::motor(2)),
            Some(ChannelConfig::motor(3)),
            Some(ChannelConfig::servo(0)),
            Some(ChannelConfig {
                endpoint_low: 1100,
                endpoint_high: 1900,
                ..ChannelConfig::servo(1)
            }),
            None,
            None,
        ]
    }

    #[test]
    fn test_validate_rejects_inverted_endpoints() {
        let config = ChannelConfig {
            endpoint_low: 1900,
            endpoint_high: 1100,
            ..ChannelConfig::servo(0)
        };
        assert_eq!(
            config.validate(3),
            Err(ConfigError::InvertedEndpoints { channel: 3 })
        );
    }

    #[test]
    fn test_validate_rejects_center_outside() {
        let config = ChannelConfig {
            center: 2100,
            ..ChannelConfig::servo(0)
        };
        assert_eq!(
            config.validate(0),
            Err(ConfigError::CenterOutOfRange { channel: 0 })
        );
    }

    #[test]
    fn test_validate_rejects_bad_direction_and_source() {
        let config = ChannelConfig {
            direction: 0,
            ..ChannelConfig::servo(0)
        };
        assert_eq!(
            config.validate(1),
            Err(ConfigError::InvalidDirection { channel: 1 })
        );

        let config = ChannelConfig::servo(MAX_SERVOS as u8);
        assert_eq!(
            config.validate(2),
            Err(ConfigError::SourceOutOfRange { channel: 2 })
        );
        assert!(ChannelConfig::motor(11).validate(2).is_ok());
    }

    #[test]
    fn test_validate_rejects_unencodable_pulse() {
        let config = ChannelConfig {
            endpoint_high: 3000,
            ..ChannelConfig::servo(0)
        };
        assert_eq!(
            config.validate(0),
            Err(ConfigError::PulseOutOfRange { channel: 0 })
        );
    }

    #[test]
    fn test_map_rejects_min_pulse_outside_motor_range() {
        let mut channels = quad_with_tilt();
        channels[2] = Some(ChannelConfig {
            endpoint_low: 1100,
            center: 1100,
            ..ChannelConfig::motor(2)
        });
        assert_eq!(
            ChannelMap::new(channels, 1000),
            Err(ConfigError::MinimumOutsideEndpoints { channel: 2 })
        );
    }

    #[test]
    fn test_servo_limits_follow_servo_channels() {
        let mut channels = quad_with_tilt();
        channels[6] = Some(ChannelConfig {
            direction: -1,
            center: 1520,
            ..ChannelConfig::servo(3)
        });
        let map = ChannelMap::new(channels, 1000).unwrap();
        let limits = map.servo_limits(1500);

        assert_eq!(limits[1], ServoLimits::new(1, 1500, 1100, 1900));
        assert_eq!(limits[3], ServoLimits::new(-1, 1520, 1000, 2000));
        assert_eq!(limits[7], ServoLimits::new(1, 1500, 1000, 2000));
    }

    #[test]
    fn test_compose_clamps_and_encodes() {
        let map = ChannelMap::new(quad_with_tilt(), 1000).unwrap();
        let mut mix = MixOutput {
            motors: [0; MAX_MOTORS],
            motor_count: 4,
            servos: [1500; MAX_SERVOS],
            fault: None,
        };
        mix.motors[..4].copy_from_slice(&[1200, 2300, 900, 1501]);
        mix.servos[1] = 1950;

        let frame = map.compose(&mix);
        assert_eq!(motor_to_pulse(frame.pulses[0]), 1200);
        assert_eq!(motor_to_pulse(frame.pulses[1]), 2000);
        assert_eq!(motor_to_pulse(frame.pulses[2]), 1000);
        assert_eq!(motor_to_pulse(frame.pulses[3]), 1501);
        assert_eq!(servo_to_pulse(frame.pulses[4]), 1500);
        assert_eq!(servo_to_pulse(frame.pulses[5]), 1900);
        assert_eq!(frame.pulses[6], 0);
    }

    #[test]
    fn test_compose_unused_motor_slot_gets_minimum() {
        let map = ChannelMap::new(quad_with_tilt(), 1000).unwrap();
        let mix = MixOutput {
            motors: [1600; MAX_MOTORS],
            motor_count: 2,
            servos: [1500; MAX_SERVOS],
            fault: None,
        };
        let frame = map.compose(&mix);
        assert_eq!(motor_to_pulse(frame.pulses[1]), 1600);
        assert_eq!(motor_to_pulse(frame.pulses[2]), 1000);
    }
}
