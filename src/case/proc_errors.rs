use crate::boundary::BoundaryError;
use crate::case::dictionary::ParseError;
use crate::io::IoError;
use crate::units::QuantityError;
use crate::validation::{ValidationError, format_report};

/// Case writing error type.
#[derive(Debug)]
pub enum CaseError {
    /// IO error. A previously written case is left as it was.
    IoError(IoError),
    /// A quantity has the wrong unit.
    Quantity(QuantityError),
    /// A boundary could not be serialized.
    Boundary(BoundaryError),
    /// The analysis failed validation; nothing was written.
    Invalid(Vec<ValidationError>),
    /// A dictionary file could not be parsed.
    Parse(ParseError),
    /// StringOnly error.
    StringOnly(String),
}
impl std::fmt::Display for CaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaseError::IoError(error) => write!(f, "- IO Error:\n{}", error),
            CaseError::Quantity(error) => write!(f, "- Unit Error:\n{}", error),
            CaseError::Boundary(error) => write!(f, "- Boundary Error:\n{}", error),
            CaseError::Invalid(errors) => write!(f, "- Validation failed with {} error(s):\n{}", errors.len(), format_report(errors)),
            CaseError::Parse(error) => write!(f, "- Dictionary Error:\n{}", error),
            CaseError::StringOnly(error) => write!(f, "- {}", error),
        }
    }
}
impl From<IoError> for CaseError {
    fn from(error: IoError) -> Self {
        CaseError::IoError(error)
    }
}
impl From<QuantityError> for CaseError {
    fn from(error: QuantityError) -> Self {
        CaseError::Quantity(error)
    }
}
impl From<BoundaryError> for CaseError {
    fn from(error: BoundaryError) -> Self {
        CaseError::Boundary(error)
    }
}
impl From<ParseError> for CaseError {
    fn from(error: ParseError) -> Self {
        CaseError::Parse(error)
    }
}
impl From<String> for CaseError {
    fn from(error: String) -> Self {
        CaseError::StringOnly(error)
    }
}

/// Result type for the `case` module.
pub type ProcResult<T> = std::result::Result<T, CaseError>;

/// Create a `CaseError::StringOnly` from a string.
pub fn err_str<T>(error_str: &str) -> ProcResult<T> {
    Err(CaseError::StringOnly(error_str.to_string()))
}
