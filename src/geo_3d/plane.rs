use std::fmt;

use crate::geo_3d::{Point, GeoVector};

/// A plane in 3D space.
/// Contains a normal vector and an offset.
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    normal: GeoVector,
    pub offset: f64,
}
impl Plane {
    /// Create a new plane from a normal vector and a point.
    pub fn from_normal_and_point(normal: GeoVector, point: Point) -> Self {
        let normal = normal.normalize();
        let offset = normal.dot(&point.into());
        Plane{normal, offset}
    }

    /// Get the normal vector of the plane. Guaranteed to be normalized.
    pub fn get_normal(&self) -> GeoVector {
        self.normal
    }

    /// Get the signed distance from a point to the plane.
    pub fn distance_to_point(&self, point: &Point) -> f64 {
        self.normal.dot(&(*point).into()) - self.offset
    }
}
impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Plane: normal={}, offset={}", self.normal, self.offset)
    }
}
