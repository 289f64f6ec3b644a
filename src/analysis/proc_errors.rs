use crate::geo_3d::GeoError;
use crate::validation::{ValidationError, format_report};

/// Analysis loading and checking error type.
#[derive(Debug)]
pub enum AnalysisError {
    /// IO error.
    IoError(crate::io::IoError),
    /// Config content does not match the expected layout.
    Config(serde_json::Error),
    /// Referenced geometry could not be loaded.
    Geometry(GeoError),
    /// The analysis failed validation.
    Invalid(Vec<ValidationError>),
    /// StringOnly error.
    StringOnly(String),
}
impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::IoError(error) => write!(f, "- IO Error:\n{}", error),
            AnalysisError::Config(error) => write!(f, "- Config Error:\n{}", error),
            AnalysisError::Geometry(error) => write!(f, "- Geometry Error:\n{}", error),
            AnalysisError::Invalid(errors) => write!(f, "- Validation failed with {} error(s):\n{}", errors.len(), format_report(errors)),
            AnalysisError::StringOnly(error) => write!(f, "- {}", error),
        }
    }
}
impl From<crate::io::IoError> for AnalysisError {
    fn from(error: crate::io::IoError) -> Self {
        AnalysisError::IoError(error)
    }
}
impl From<serde_json::Error> for AnalysisError {
    fn from(error: serde_json::Error) -> Self {
        AnalysisError::Config(error)
    }
}
impl From<GeoError> for AnalysisError {
    fn from(error: GeoError) -> Self {
        AnalysisError::Geometry(error)
    }
}
impl From<String> for AnalysisError {
    fn from(error: String) -> Self {
        AnalysisError::StringOnly(error)
    }
}

/// Result type for the `analysis` module.
pub type ProcResult<T> = std::result::Result<T, AnalysisError>;

/// Create an `AnalysisError::StringOnly` from a string.
pub fn err_str<T>(error_str: &str) -> ProcResult<T> {
    Err(AnalysisError::StringOnly(error_str.to_string()))
}
