//! Chart-space and pixel-space coordinate types.

use serde::{Deserialize, Serialize};

/// Opaque ordered chart-time key.
///
/// The host owns the meaning of the value (epoch seconds, bar index, ...);
/// the overlay only relies on ordering and uniform shifts during whole-body
/// drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChartTime(pub i64);

impl ChartTime {
    /// Shift this time by a signed delta.
    pub fn offset_by(self, delta: i64) -> ChartTime {
        ChartTime(self.0 + delta)
    }

    /// Signed delta from `other` to `self`.
    pub fn delta_from(self, other: ChartTime) -> i64 {
        self.0 - other.0
    }
}

impl From<i64> for ChartTime {
    fn from(value: i64) -> Self {
        ChartTime(value)
    }
}

/// A point in chart space. Immutable value type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub time: ChartTime,
    pub price: f64,
}

impl ChartPoint {
    /// Creates a new chart point.
    pub fn new(time: ChartTime, price: f64) -> Self {
        Self { time, price }
    }
}

/// A point in pixel space (media coordinates of the chart pane).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    /// Creates a new pixel point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether `other` lies within `radius` pixels of this point.
    ///
    /// Compares squared distances to avoid the square root.
    pub fn distance_within(&self, other: PixelPoint, radius: f64) -> bool {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy <= radius * radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_time_arithmetic() {
        let t = ChartTime(100);
        assert_eq!(t.offset_by(25), ChartTime(125));
        assert_eq!(t.offset_by(-25), ChartTime(75));
        assert_eq!(ChartTime(125).delta_from(t), 25);
    }

    #[test]
    fn test_distance_within() {
        let p = PixelPoint::new(10.0, 10.0);
        assert!(p.distance_within(PixelPoint::new(13.0, 14.0), 5.0));
        // Boundary: exactly at the radius counts as close.
        assert!(p.distance_within(PixelPoint::new(15.0, 10.0), 5.0));
        assert!(!p.distance_within(PixelPoint::new(15.1, 10.0), 5.0));
    }
}
