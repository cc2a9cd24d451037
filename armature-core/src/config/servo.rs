//! Servo datasheet and joint limit types

/// Electrical and mechanical parameters of one servo model
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServoDatasheet {
    /// Full mechanical travel in degrees
    pub angle_range: f32,
    /// PWM period in microseconds
    pub period_us: u32,
    /// Pulse width at 0 degrees
    pub min_duty_us: u32,
    /// Pulse width at `angle_range` degrees
    pub max_duty_us: u32,
}

impl ServoDatasheet {
    /// TowerPro MG996R, 180 degrees, 50 Hz, 0.5-2.5 ms pulses
    pub const MG996R: Self = Self {
        angle_range: 180.0,
        period_us: 20_000,
        min_duty_us: 500,
        max_duty_us: 2_500,
    };

    /// TowerPro SG90 micro servo
    pub const SG90: Self = Self {
        angle_range: 180.0,
        period_us: 20_000,
        min_duty_us: 500,
        max_duty_us: 2_400,
    };

    /// Look up a built-in datasheet by model name
    pub fn preset(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("mg996r") {
            Some(Self::MG996R)
        } else if name.eq_ignore_ascii_case("sg90") {
            Some(Self::SG90)
        } else {
            None
        }
    }

    /// Middle of the travel
    pub fn center(&self) -> f32 {
        self.angle_range / 2.0
    }

    /// Check the datasheet describes a usable servo
    ///
    /// The range and period must be positive and the pulse window must
    /// fit strictly inside one period.
    pub fn is_valid(&self) -> bool {
        self.angle_range.is_finite()
            && self.angle_range > 0.0
            && self.period_us > 0
            && self.min_duty_us <= self.max_duty_us
            && self.max_duty_us < self.period_us
    }
}

impl Default for ServoDatasheet {
    fn default() -> Self {
        Self::MG996R
    }
}

/// Inclusive angle window a joint may be commanded to
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AngleLimits {
    lower: f32,
    upper: f32,
}

impl AngleLimits {
    /// Create limits, checking `0 <= lower <= upper <= angle_range`
    pub fn new(lower: f32, upper: f32, angle_range: f32) -> Option<Self> {
        let valid = lower.is_finite()
            && upper.is_finite()
            && lower >= 0.0
            && lower <= upper
            && upper <= angle_range;
        valid.then_some(Self { lower, upper })
    }

    /// Limits spanning the whole travel
    pub fn full(angle_range: f32) -> Self {
        Self {
            lower: 0.0,
            upper: angle_range.max(0.0),
        }
    }

    /// Lowest permitted angle
    pub fn lower(&self) -> f32 {
        self.lower
    }

    /// Highest permitted angle
    pub fn upper(&self) -> f32 {
        self.upper
    }

    /// Check whether an angle lies inside the window
    pub fn contains(&self, angle: f32) -> bool {
        angle >= self.lower && angle <= self.upper
    }

    /// Clamp an angle into the window
    ///
    /// NaN passes through unchanged so callers can reject it.
    pub fn clamp(&self, angle: f32) -> f32 {
        if angle < self.lower {
            self.lower
        } else if angle > self.upper {
            self.upper
        } else {
            angle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_mg996r_is_valid() {
        assert!(ServoDatasheet::MG996R.is_valid());
        assert_eq!(ServoDatasheet::default(), ServoDatasheet::MG996R);
        assert_eq!(ServoDatasheet::MG996R.center(), 90.0);
    }

    #[test]
    fn test_datasheet_rejects_bad_windows() {
        let mut ds = ServoDatasheet::MG996R;
        ds.max_duty_us = 20_000;
        assert!(!ds.is_valid());

        let mut ds = ServoDatasheet::MG996R;
        ds.min_duty_us = 2_600;
        assert!(!ds.is_valid());

        let mut ds = ServoDatasheet::MG996R;
        ds.angle_range = 0.0;
        assert!(!ds.is_valid());

        let mut ds = ServoDatasheet::MG996R;
        ds.period_us = 0;
        assert!(!ds.is_valid());
    }

    #[test]
    fn test_preset_lookup() {
        assert_eq!(ServoDatasheet::preset("MG996R"), Some(ServoDatasheet::MG996R));
        assert_eq!(ServoDatasheet::preset("sg90"), Some(ServoDatasheet::SG90));
        assert_eq!(ServoDatasheet::preset("unknown"), None);
    }

    #[test]
    fn test_limits_validation() {
        assert!(AngleLimits::new(3.0, 177.0, 180.0).is_some());
        assert!(AngleLimits::new(90.0, 90.0, 180.0).is_some());
        assert!(AngleLimits::new(100.0, 90.0, 180.0).is_none());
        assert!(AngleLimits::new(-1.0, 90.0, 180.0).is_none());
        assert!(AngleLimits::new(0.0, 181.0, 180.0).is_none());
        assert!(AngleLimits::new(f32::NAN, 90.0, 180.0).is_none());
    }

    #[test]
    fn test_clamp_boundaries() {
        let limits = AngleLimits::new(3.0, 177.0, 180.0).unwrap();
        assert_eq!(limits.clamp(0.0), 3.0);
        assert_eq!(limits.clamp(180.0), 177.0);
        assert_eq!(limits.clamp(3.0), 3.0);
        assert_eq!(limits.clamp(177.0), 177.0);
        assert_eq!(limits.clamp(f32::NEG_INFINITY), 3.0);
        assert!(limits.clamp(f32::NAN).is_nan());
    }

    proptest! {
        #[test]
        fn prop_clamp_stays_inside(lower in 0.0f32..180.0, span in 0.0f32..180.0, angle in -1000.0f32..1000.0) {
            let upper = (lower + span).min(180.0);
            let limits = AngleLimits::new(lower, upper, 180.0).unwrap();
            let clamped = limits.clamp(angle);
            prop_assert!(limits.contains(clamped));
            if limits.contains(angle) {
                prop_assert_eq!(clamped, angle);
            }
        }
    }
}
