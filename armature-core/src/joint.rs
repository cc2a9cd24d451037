//! A single servo joint

use armature_hal::PwmChannel;

use crate::config::{AngleLimits, JointConfig, ServoDatasheet};
use crate::error::ArmError;
use crate::motion::duty_level;

/// One servo bound to one PWM output
///
/// `angle` always holds the last angle written to the channel, and always
/// lies inside `limits`.
#[derive(Debug)]
pub struct Joint<P> {
    channel: P,
    datasheet: ServoDatasheet,
    limits: AngleLimits,
    angle: f32,
}

impl<P: PwmChannel> Joint<P> {
    /// Create a joint with full-travel limits, resting at the center
    ///
    /// Nothing is written to the channel until the first `set_angle`.
    pub fn new(channel: P, datasheet: ServoDatasheet) -> Self {
        Self {
            channel,
            datasheet,
            limits: AngleLimits::full(datasheet.angle_range),
            angle: datasheet.center(),
        }
    }

    /// Create a joint from its configuration entry
    pub fn from_config(config: &JointConfig, channel: P) -> Result<Self, ArmError> {
        if !config.datasheet.is_valid() {
            return Err(ArmError::InvalidDatasheet);
        }
        let limits = AngleLimits::new(config.lower, config.upper, config.datasheet.angle_range)
            .ok_or(ArmError::InvalidLimits)?;
        Ok(Self {
            channel,
            datasheet: config.datasheet,
            limits,
            angle: limits.clamp(config.angle),
        })
    }

    /// Clamp `angle` into the limits, write its PWM level and record it
    ///
    /// Returns the angle actually commanded. A NaN request is ignored and
    /// the current angle is returned.
    pub fn set_angle(&mut self, angle: f32) -> f32 {
        if angle.is_nan() {
            return self.angle;
        }
        let angle = self.limits.clamp(angle);
        self.channel.set_level(duty_level(&self.datasheet, angle));
        self.angle = angle;
        angle
    }

    /// Last commanded angle
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn datasheet(&self) -> &ServoDatasheet {
        &self.datasheet
    }

    pub fn limits(&self) -> &AngleLimits {
        &self.limits
    }

    /// PWM level for the current angle
    pub fn level(&self) -> u16 {
        duty_level(&self.datasheet, self.angle)
    }

    pub fn channel(&self) -> &P {
        &self.channel
    }

    /// Replace the limits
    ///
    /// The recorded angle is pulled into the new window without writing to
    /// the channel; the next command moves the servo.
    pub fn set_limits(&mut self, limits: AngleLimits) -> Result<(), ArmError> {
        if limits.upper() > self.datasheet.angle_range {
            return Err(ArmError::InvalidLimits);
        }
        self.limits = limits;
        self.angle = limits.clamp(self.angle);
        Ok(())
    }

    /// Replace the datasheet
    ///
    /// The current limits must still fit inside the new angle range.
    pub fn set_datasheet(&mut self, datasheet: ServoDatasheet) -> Result<(), ArmError> {
        if !datasheet.is_valid() {
            return Err(ArmError::InvalidDatasheet);
        }
        if self.limits.upper() > datasheet.angle_range {
            return Err(ArmError::InvalidLimits);
        }
        self.datasheet = datasheet;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockPwm;

    fn joint() -> Joint<MockPwm> {
        Joint::new(MockPwm::new(), ServoDatasheet::MG996R)
    }

    #[test]
    fn test_new_rests_at_center_without_writing() {
        let j = joint();
        assert_eq!(j.angle(), 90.0);
        assert_eq!(j.limits().lower(), 0.0);
        assert_eq!(j.limits().upper(), 180.0);
        assert!(j.channel().history.is_empty());
    }

    #[test]
    fn test_set_angle_writes_level() {
        let mut j = joint();
        assert_eq!(j.set_angle(180.0), 180.0);
        assert_eq!(j.channel().last(), Some(5_000));
        assert_eq!(j.level(), 5_000);
    }

    #[test]
    fn test_set_angle_clamps_before_mapping() {
        let mut j = joint();
        j.set_limits(AngleLimits::new(3.0, 177.0, 180.0).unwrap())
            .unwrap();

        assert_eq!(j.set_angle(0.0), 3.0);
        assert_eq!(j.angle(), 3.0);
        assert_eq!(j.channel().last(), Some(duty_level(&ServoDatasheet::MG996R, 3.0)));

        assert_eq!(j.set_angle(200.0), 177.0);
        assert_eq!(j.channel().last(), Some(duty_level(&ServoDatasheet::MG996R, 177.0)));
    }

    #[test]
    fn test_set_angle_ignores_nan() {
        let mut j = joint();
        j.set_angle(45.0);
        assert_eq!(j.set_angle(f32::NAN), 45.0);
        assert_eq!(j.channel().history.len(), 1);
    }

    #[test]
    fn test_set_limits_pulls_angle_in() {
        let mut j = joint();
        j.set_limits(AngleLimits::new(100.0, 170.0, 180.0).unwrap())
            .unwrap();
        assert_eq!(j.angle(), 100.0);
        assert!(j.channel().history.is_empty());
    }

    #[test]
    fn test_set_datasheet_checks_limits() {
        let mut j = joint();
        let narrow = ServoDatasheet {
            angle_range: 120.0,
            ..ServoDatasheet::MG996R
        };
        assert_eq!(j.set_datasheet(narrow), Err(ArmError::InvalidLimits));

        j.set_limits(AngleLimits::new(10.0, 110.0, 180.0).unwrap())
            .unwrap();
        assert_eq!(j.set_datasheet(narrow), Ok(()));
        assert_eq!(j.datasheet().angle_range, 120.0);

        let broken = ServoDatasheet {
            period_us: 0,
            ..ServoDatasheet::MG996R
        };
        assert_eq!(j.set_datasheet(broken), Err(ArmError::InvalidDatasheet));
    }

    #[test]
    fn test_from_config_clamps_initial_angle() {
        let config = JointConfig {
            lower: 3.0,
            upper: 177.0,
            angle: 179.0,
            ..JointConfig::default()
        };
        let j = Joint::from_config(&config, MockPwm::new()).unwrap();
        assert_eq!(j.angle(), 177.0);

        let bad = JointConfig {
            lower: 50.0,
            upper: 40.0,
            ..JointConfig::default()
        };
        assert!(matches!(
            Joint::from_config(&bad, MockPwm::new()),
            Err(ArmError::InvalidLimits)
        ));
    }
}
