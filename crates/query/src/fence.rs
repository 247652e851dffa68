//! Fence — latitude/longitude bounding box for geofence queries.

/// A closed bounding box over latitude and longitude.
///
/// Construction orders each axis's bounds independently, so callers may
/// pass the corners in any order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoFence {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl GeoFence {
    pub fn new(lat_a: f64, lat_b: f64, lon_a: f64, lon_b: f64) -> Self {
        let (lat_min, lat_max) = order(lat_a, lat_b);
        let (lon_min, lon_max) = order(lon_a, lon_b);
        Self { lat_min, lat_max, lon_min, lon_max }
    }

    /// Whether a point lies inside the fence, boundary included.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.lat_min && lat <= self.lat_max && lon >= self.lon_min && lon <= self.lon_max
    }
}

fn order(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
