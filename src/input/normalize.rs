//! Raw ADC reading to normalized stick position
//!
//! The Base Hat ADC is 12-bit, so a resting stick sits near the middle of
//! `0..=4095`. Values are centered on 2047.5 and scaled so each axis lands
//! in [-1.0, 1.0].

/// Largest value a 12-bit ADC channel can report
pub const ADC_MAX_RAW: u16 = 4095;

/// Midpoint of the 12-bit range
pub const ADC_CENTER: f32 = ADC_MAX_RAW as f32 / 2.0;

/// One tick's raw reading of both joystick axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisReading {
    pub x: u16,
    pub y: u16,
}

/// Stick position with both axes in [-1.0, 1.0], center = 0.0
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NormalizedAxis {
    pub x: f32,
    pub y: f32,
}

impl AxisReading {
    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Center and scale both axes, clamping to [-1.0, 1.0]
    pub fn normalize(self) -> NormalizedAxis {
        NormalizedAxis {
            x: normalize_raw(self.x),
            y: normalize_raw(self.y),
        }
    }
}

/// Normalize a single raw channel value
///
/// # Example
/// ```
/// use joystick_sounds::input::normalize::normalize_raw;
///
/// assert_eq!(normalize_raw(4095), 1.0);
/// assert_eq!(normalize_raw(0), -1.0);
/// assert!(normalize_raw(2047).abs() < 0.001);
/// ```
pub fn normalize_raw(raw: u16) -> f32 {
    ((raw as f32 - ADC_CENTER) / ADC_CENTER).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extremes() {
        assert_eq!(normalize_raw(0), -1.0);
        assert_eq!(normalize_raw(ADC_MAX_RAW), 1.0);
    }

    #[test]
    fn test_resting_stick_is_near_zero() {
        let axis = AxisReading::new(2047, 2048).normalize();
        assert!(axis.x.abs() < 0.001);
        assert!(axis.y.abs() < 0.001);
        assert!(axis.x < 0.0 && axis.y > 0.0);
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        // A misbehaving channel can report more than 12 bits
        assert_eq!(normalize_raw(u16::MAX), 1.0);
    }

    #[test]
    fn test_full_right_half_up() {
        let axis = AxisReading::new(4095, 2047).normalize();
        assert_eq!(axis.x, 1.0);
        assert!(axis.y.abs() < 0.001);
    }
}
