//! Screen <-> geographic projection seam and a Web-Mercator viewport.
//!
//! # Responsibility
//! - Define the narrow projection contract the selection core consumes.
//! - Provide a slippy-map viewport implementation for hosts without their own
//!   map widget (CLI, tests).
//!
//! # Invariants
//! - Screen coordinates are device-independent pixels with the origin at the
//!   top-left corner of the viewport.
//! - Projection state is read live on every call; callers must not cache
//!   converted points across viewport changes.

use crate::model::geo::{GeoPoint, ScreenPoint};
use std::f64::consts::PI;

pub const TILE_SIZE: f64 = 256.0;
const MAX_MERCATOR_LAT: f64 = 85.051_128_78;

/// Map viewport projection and location source.
pub trait GeoProjection {
    fn screen_to_geo(&self, point: ScreenPoint) -> GeoPoint;
    fn geo_to_screen(&self, point: GeoPoint) -> ScreenPoint;
    fn current_zoom(&self) -> f64;
    /// Latest GPS fix, or `None` when no location is known yet.
    fn last_known_gps_fix(&self) -> Option<GeoPoint>;
}

/// Web-Mercator viewport centered on a geographic point.
#[derive(Debug, Clone, PartialEq)]
pub struct MercatorViewport {
    center: GeoPoint,
    zoom: f64,
    width: f64,
    height: f64,
    gps_fix: Option<GeoPoint>,
}

impl MercatorViewport {
    pub fn new(center: GeoPoint, zoom: f64, width: f64, height: f64) -> Self {
        Self {
            center: clamp_geo(center),
            zoom,
            width,
            height,
            gps_fix: None,
        }
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn set_center(&mut self, center: GeoPoint) {
        self.center = clamp_geo(center);
    }

    pub fn set_gps_fix(&mut self, fix: Option<GeoPoint>) {
        self.gps_fix = fix;
    }

    /// Moves the map content by `(dx, dy)` pixels, as a finger pan would.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let new_center = self.screen_to_geo(ScreenPoint::new(
            self.width / 2.0 - dx,
            self.height / 2.0 - dy,
        ));
        self.set_center(new_center);
    }

    fn world_size(&self) -> f64 {
        TILE_SIZE * 2f64.powf(self.zoom)
    }

    fn to_world(&self, point: GeoPoint) -> (f64, f64) {
        let size = self.world_size();
        let x = (point.lon + 180.0) / 360.0 * size;
        let lat_rad = point.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
        let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * size;
        (x, y)
    }

    fn from_world(&self, x: f64, y: f64) -> GeoPoint {
        let size = self.world_size();
        let lon = x / size * 360.0 - 180.0;
        let n = PI - 2.0 * PI * y / size;
        let lat = n.sinh().atan().to_degrees();
        GeoPoint::new(lat, lon)
    }
}

impl GeoProjection for MercatorViewport {
    fn screen_to_geo(&self, point: ScreenPoint) -> GeoPoint {
        let (cx, cy) = self.to_world(self.center);
        self.from_world(
            cx + point.x - self.width / 2.0,
            cy + point.y - self.height / 2.0,
        )
    }

    fn geo_to_screen(&self, point: GeoPoint) -> ScreenPoint {
        let (cx, cy) = self.to_world(self.center);
        let (x, y) = self.to_world(point);
        ScreenPoint::new(x - cx + self.width / 2.0, y - cy + self.height / 2.0)
    }

    fn current_zoom(&self) -> f64 {
        self.zoom
    }

    fn last_known_gps_fix(&self) -> Option<GeoPoint> {
        self.gps_fix
    }
}

fn clamp_geo(point: GeoPoint) -> GeoPoint {
    GeoPoint::new(
        point.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT),
        point.lon.clamp(-180.0, 180.0),
    )
}
