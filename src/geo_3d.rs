//! Minimal 3D geometry for boundary faces.
//! The CAD kernel stays outside the crate; faces arrive as outlines or
//! tessellations and only planarity and normals are computed here.

mod point;
mod vector;
mod plane;
mod face;
mod proc_errors;

pub use point::Point;
pub use vector::GeoVector;
pub use plane::Plane;
pub use face::{
    Face,
    FaceCfg,
    FaceRef,
    Geometry,
};
pub use proc_errors::{
    GeoError,
    ProcResult,
    err_str,
};
