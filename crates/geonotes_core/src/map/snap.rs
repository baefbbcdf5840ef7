//! GPS snapping for freshly placed notes.

use crate::map::projection::GeoProjection;
use crate::model::geo::GeoPoint;
use log::debug;

/// Screen distance below which a new note snaps to the GPS fix.
pub const SNAP_THRESHOLD_DP: f64 = 50.0;

/// Decides whether a candidate placement should be replaced by the GPS fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpsSnapService {
    threshold: f64,
}

impl Default for GpsSnapService {
    fn default() -> Self {
        Self {
            threshold: SNAP_THRESHOLD_DP,
        }
    }
}

impl GpsSnapService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the GPS fix when snapping is enabled, a fix exists and its
    /// on-screen distance to `candidate` is strictly below the threshold.
    /// Otherwise returns `candidate` unchanged.
    pub fn maybe_snap(
        &self,
        projection: &impl GeoProjection,
        candidate: GeoPoint,
        enabled: bool,
    ) -> GeoPoint {
        if !enabled {
            return candidate;
        }
        let Some(fix) = projection.last_known_gps_fix() else {
            return candidate;
        };

        let distance = projection
            .geo_to_screen(candidate)
            .distance_to(projection.geo_to_screen(fix));
        if distance < self.threshold {
            debug!("event=gps_snap module=map status=snapped distance_dp={distance:.1}");
            fix
        } else {
            candidate
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::geo::ScreenPoint;

    /// One degree equals one screen pixel.
    struct FlatProjection {
        fix: Option<GeoPoint>,
    }

    impl GeoProjection for FlatProjection {
        fn screen_to_geo(&self, point: ScreenPoint) -> GeoPoint {
            GeoPoint::new(point.y, point.x)
        }

        fn geo_to_screen(&self, point: GeoPoint) -> ScreenPoint {
            ScreenPoint::new(point.lon, point.lat)
        }

        fn current_zoom(&self) -> f64 {
            1.0
        }

        fn last_known_gps_fix(&self) -> Option<GeoPoint> {
            self.fix
        }
    }

    fn with_fix() -> FlatProjection {
        FlatProjection {
            fix: Some(GeoPoint::new(0.0, 0.0)),
        }
    }

    #[test]
    fn snaps_just_inside_threshold() {
        let candidate = GeoPoint::new(0.0, 49.0);
        let snapped = GpsSnapService::new().maybe_snap(&with_fix(), candidate, true);
        assert_eq!(snapped, GeoPoint::new(0.0, 0.0));
    }

    #[test]
    fn keeps_candidate_just_outside_threshold() {
        let candidate = GeoPoint::new(0.0, 51.0);
        let snapped = GpsSnapService::new().maybe_snap(&with_fix(), candidate, true);
        assert_eq!(snapped, candidate);
    }

    #[test]
    fn exactly_on_threshold_does_not_snap() {
        // 30-40-50 triangle keeps the distance exact.
        let candidate = GeoPoint::new(40.0, 30.0);
        let snapped = GpsSnapService::new().maybe_snap(&with_fix(), candidate, true);
        assert_eq!(snapped, candidate);
    }

    #[test]
    fn disabled_or_missing_fix_keeps_candidate() {
        let candidate = GeoPoint::new(0.0, 1.0);
        let service = GpsSnapService::new();
        assert_eq!(service.maybe_snap(&with_fix(), candidate, false), candidate);
        let no_fix = FlatProjection { fix: None };
        assert_eq!(service.maybe_snap(&no_fix, candidate, true), candidate);
    }
}
