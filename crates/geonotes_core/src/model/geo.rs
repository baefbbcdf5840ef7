//! Coordinate value types shared by projection, snapping and markers.

use serde::{Deserialize, Serialize};

/// Geographic position in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Position on the map view in device-independent pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other` in screen units.
    pub fn distance_to(self, other: ScreenPoint) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::ScreenPoint;

    #[test]
    fn distance_is_euclidean() {
        let a = ScreenPoint::new(0.0, 0.0);
        let b = ScreenPoint::new(30.0, 40.0);
        assert_eq!(a.distance_to(b), 50.0);
        assert_eq!(b.distance_to(a), 50.0);
    }
}
