//! Map projection and coordinate transformation.
//!
//! Handles converting between geographic coordinates (lat/lon) and
//! scene coordinates for the 3D renderer.

use crate::config::MapBounds;
use geo_types::Coord;
use glam::Vec3;

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<GeoPoint> for Coord<f64> {
    fn from(p: GeoPoint) -> Self {
        Coord { x: p.lon, y: p.lat }
    }
}

impl From<Coord<f64>> for GeoPoint {
    fn from(c: Coord<f64>) -> Self {
        GeoPoint { lat: c.y, lon: c.x }
    }
}

/// A position in scene units. `x` runs north, `y` up, `z` east.
pub type WorldPoint = Vec3;

/// Projects a point onto the reference map box.
///
/// Shorthand for `MapProjection::default().project(point, height)`.
pub fn project(point: GeoPoint, height: f64) -> WorldPoint {
    MapProjection::default().project(point, height)
}

/// Projection for converting geographic to scene coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MapProjection {
    pub bounds: MapBounds,
}

impl MapProjection {
    pub fn new(bounds: MapBounds) -> Self {
        Self { bounds }
    }

    /// Scene units per degree of latitude.
    pub fn lat_scale(&self) -> f64 {
        self.bounds.meters_per_deg_lat * self.bounds.global_scale
    }

    /// Scene units per degree of longitude.
    pub fn lon_scale(&self) -> f64 {
        self.bounds.meters_per_deg_lon * self.bounds.global_scale
    }

    /// Converts a geographic position and a height in meters to scene
    /// coordinates.
    ///
    /// Uses a local equirectangular projection around the box midpoint, which
    /// is adequate for an area well under a kilometre across. Points outside
    /// the box project just as well.
    pub fn project(&self, point: GeoPoint, height: f64) -> WorldPoint {
        let x = (point.lat - self.bounds.lat_mid()) * self.lat_scale();
        let y = height * self.bounds.global_scale;
        let z = (point.lon - self.bounds.lon_mid()) * self.lon_scale();
        Vec3::new(x as f32, y as f32, z as f32)
    }

    /// Converts a length in meters to scene units.
    pub fn meters(&self, meters: f64) -> f32 {
        (meters * self.bounds.global_scale) as f32
    }

    /// Size of the whole map box in scene units as (along x, along z).
    pub fn footprint(&self) -> (f32, f32) {
        (
            (self.bounds.lat_span() * self.lat_scale()) as f32,
            (self.bounds.lon_span() * self.lon_scale()) as f32,
        )
    }

    /// Checks if a point lies within the reference box.
    pub fn contains(&self, point: GeoPoint) -> bool {
        point.lat >= self.bounds.lat_min
            && point.lat <= self.bounds.lat_max
            && point.lon >= self.bounds.lon_min
            && point.lon <= self.bounds.lon_max
    }
}
