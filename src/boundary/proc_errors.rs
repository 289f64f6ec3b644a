use crate::geo_3d::GeoError;
use crate::units::QuantityError;
use crate::validation::ValidationError;

/// Boundary condition error type.
#[derive(Debug)]
pub enum BoundaryError {
    /// A quantity has the wrong unit.
    Quantity(QuantityError),
    /// A direction could not be derived from the geometry.
    Geometry(GeoError),
    /// A required input is missing or out of range.
    Invalid(ValidationError),
    /// StringOnly error.
    StringOnly(String),
}
impl std::fmt::Display for BoundaryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundaryError::Quantity(error) => write!(f, "- Unit Error:\n{}", error),
            BoundaryError::Geometry(error) => write!(f, "- Geometry Error:\n{}", error),
            BoundaryError::Invalid(error) => write!(f, "- {}", error),
            BoundaryError::StringOnly(error) => write!(f, "- {}", error),
        }
    }
}
impl From<QuantityError> for BoundaryError {
    fn from(error: QuantityError) -> Self {
        BoundaryError::Quantity(error)
    }
}
impl From<GeoError> for BoundaryError {
    fn from(error: GeoError) -> Self {
        BoundaryError::Geometry(error)
    }
}
impl From<ValidationError> for BoundaryError {
    fn from(error: ValidationError) -> Self {
        BoundaryError::Invalid(error)
    }
}

/// Result type for the `boundary` module.
pub type ProcResult<T> = std::result::Result<T, BoundaryError>;

/// Create a `BoundaryError::StringOnly` from a string.
pub fn err_str<T>(error_str: &str) -> ProcResult<T> {
    Err(BoundaryError::StringOnly(error_str.to_string()))
}
