//! Auto-scroll speed and the tick interval derived from it

use std::fmt;
use std::time::Duration;

/// Auto-scroll speed in [0, 5]. Zero disables auto-scroll.
///
/// Any value inside the range is kept as given; only key stepping moves on
/// the 0.1 grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Speed(f64);

/// Granularity of keyboard speed steps
const GRID: f64 = 10.0;

impl Speed {
    pub const ZERO: Speed = Speed(0.0);
    pub const MAX: Speed = Speed(5.0);

    /// Build a speed from any value. Out-of-range values are clamped and
    /// non-finite values become zero.
    pub fn new(value: f64) -> Self {
        if !value.is_finite() {
            return Self::ZERO;
        }
        Speed(value.clamp(Self::ZERO.0, Self::MAX.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 <= 0.0
    }

    /// Seconds between ticks: `(6 - speed) / 35`. `None` when the speed is
    /// zero, since no tick source may run at all then.
    pub fn tick_interval(self) -> Option<Duration> {
        if self.is_zero() {
            return None;
        }
        Some(Duration::from_secs_f64((6.0 - self.0) / 35.0))
    }

    /// Adjust by a signed delta, landing on the 0.1 grid and clamping at
    /// both ends
    pub fn offset_by(self, delta: f64) -> Self {
        Self::new(((self.0 + delta) * GRID).round() / GRID)
    }
}

impl From<f64> for Speed {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tenths = self.0 * GRID;
        if (tenths - tenths.round()).abs() < 1e-9 {
            write!(f, "{:.1}", self.0)
        } else {
            write!(f, "{:.2}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamping() {
        assert_eq!(Speed::new(-1.0), Speed::ZERO);
        assert_eq!(Speed::new(7.5), Speed::MAX);
        assert_eq!(Speed::new(f64::NAN), Speed::ZERO);
        assert_eq!(Speed::new(f64::INFINITY), Speed::ZERO);
        assert_eq!(Speed::new(5.0).value(), 5.0);
    }

    #[test]
    fn test_off_grid_values_kept() {
        assert_eq!(Speed::new(2.54).value(), 2.54);
        assert_eq!(Speed::new(2.5).to_string(), "2.5");
        assert_eq!(Speed::new(2.54).to_string(), "2.54");

        let interval = Speed::new(2.54).tick_interval().unwrap().as_secs_f64();
        assert!((interval - (6.0 - 2.54) / 35.0).abs() < 1e-9);
    }

    #[test]
    fn test_small_positive_speed_runs() {
        let speed = Speed::new(0.04);
        assert!(!speed.is_zero());
        let interval = speed.tick_interval().unwrap().as_secs_f64();
        assert!((interval - (6.0 - 0.04) / 35.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_has_no_interval() {
        assert_eq!(Speed::ZERO.tick_interval(), None);
    }

    #[test]
    fn test_interval_formula() {
        for tenths in 1..=50u8 {
            let s = tenths as f64 / 10.0;
            let interval = Speed::new(s).tick_interval().unwrap().as_secs_f64();
            assert!((interval - (6.0 - s) / 35.0).abs() < 1e-9, "speed {}", s);
        }
        let mid = Speed::new(2.5).tick_interval().unwrap();
        assert!((mid.as_secs_f64() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_interval_strictly_decreasing() {
        let mut prev = Duration::MAX;
        for tenths in 1..=50u8 {
            let interval = Speed::new(tenths as f64 / 10.0).tick_interval().unwrap();
            assert!(interval < prev, "not decreasing at {} tenths", tenths);
            prev = interval;
        }
        let fastest = Speed::MAX.tick_interval().unwrap().as_secs_f64();
        assert!((fastest - 1.0 / 35.0).abs() < 1e-9);
    }

    #[test]
    fn test_offset_by() {
        assert_eq!(Speed::new(1.0).offset_by(0.1), Speed::new(1.1));
        assert_eq!(Speed::new(0.1).offset_by(-1.0), Speed::ZERO);
        assert_eq!(Speed::new(4.5).offset_by(1.0), Speed::MAX);
        // Stepping from an off-grid value lands back on the grid
        assert_eq!(Speed::new(2.54).offset_by(0.1), Speed::new(2.6));
    }
}
