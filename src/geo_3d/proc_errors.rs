use crate::geo_3d::FaceRef;

/// Geometry error type.
#[derive(Debug)]
pub enum GeoError {
    /// IO error.
    IoError(crate::io::IoError),
    /// Referenced face is not part of the loaded geometry.
    MissingFace(FaceRef),
    /// Face is not planar, so it has no single normal.
    NonPlanar {
        face: FaceRef,
        deviation: f64,
    },
    /// Face has no area.
    Degenerate(FaceRef),
    /// StringOnly error.
    StringOnly(String),
}
impl std::fmt::Display for GeoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoError::IoError(error) => write!(f, "- IO Error:\n{}", error),
            GeoError::MissingFace(face) => write!(f, "- Face {} not found in geometry", face),
            GeoError::NonPlanar{face, deviation} => write!(f, "- Face {} is not planar (deviation {:.3e}), a direction cannot be derived from it", face, deviation),
            GeoError::Degenerate(face) => write!(f, "- Face {} has zero area", face),
            GeoError::StringOnly(error) => write!(f, "- {}", error),
        }
    }
}
impl From<crate::io::IoError> for GeoError {
    fn from(error: crate::io::IoError) -> Self {
        GeoError::IoError(error)
    }
}
impl From<String> for GeoError {
    fn from(error: String) -> Self {
        GeoError::StringOnly(error)
    }
}

/// Result type for the `geo_3d` module.
pub type ProcResult<T> = std::result::Result<T, GeoError>;

/// Create a `GeoError::StringOnly` from a string.
pub fn err_str<T>(error_str: &str) -> ProcResult<T> {
    Err(GeoError::StringOnly(error_str.to_string()))
}
