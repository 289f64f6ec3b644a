use crate::{
    args,
    analysis,
    case,
    solver,
};

/// Error-type enum for the `cfdcase` crate.
/// Wraps the error of every stage a command goes through.
#[derive(Debug)]
pub enum CfdError {
    ArgError(args::ArgError),
    AnalysisError(analysis::AnalysisError),
    CaseError(case::CaseError),
    SolverError(solver::SolverError),
    StringOnly(String),
}
impl CfdError {
    /// Process exit code for the error: the solver's own code if it failed,
    /// 2 for invalid input, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            CfdError::SolverError(solver::SolverError::ExitStatus{code, ..}) if *code != 0 => *code,
            CfdError::ArgError(_)
            | CfdError::AnalysisError(analysis::AnalysisError::Invalid(_))
            | CfdError::CaseError(case::CaseError::Invalid(_)) => 2,
            _ => 1,
        }
    }
}
impl std::fmt::Display for CfdError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CfdError::ArgError(error) => write!(f, "! ARGUMENT ERROR:\n{}", error),
            CfdError::AnalysisError(error) => write!(f, "! ANALYSIS ERROR:\n{}", error),
            CfdError::CaseError(error) => write!(f, "! CASE ERROR:\n{}", error),
            CfdError::SolverError(error) => write!(f, "! SOLVER ERROR:\n{}", error),
            CfdError::StringOnly(error) => write!(f, "! CFDCASE ERROR:\n- {}", error),
        }
    }
}
impl From<String> for CfdError {
    fn from(error: String) -> Self {
        CfdError::StringOnly(error)
    }
}
impl From<args::ArgError> for CfdError {
    fn from(error: args::ArgError) -> Self {
        CfdError::ArgError(error)
    }
}
impl From<analysis::AnalysisError> for CfdError {
    fn from(error: analysis::AnalysisError) -> Self {
        CfdError::AnalysisError(error)
    }
}
impl From<case::CaseError> for CfdError {
    fn from(error: case::CaseError) -> Self {
        CfdError::CaseError(error)
    }
}
impl From<solver::SolverError> for CfdError {
    fn from(error: solver::SolverError) -> Self {
        CfdError::SolverError(error)
    }
}

/// Result type for the `cfdcase` crate.
pub type CfdResult<T> = std::result::Result<T, CfdError>;

/// Create a `CfdResult` with an `Err` from a string.
/// Shorthand to avoid writing `Err(crate::CfdError::StringOnly(error_str))`.
pub fn err_str<T>(error_str: &str) -> CfdResult<T> {
    Err(CfdError::StringOnly(error_str.to_string()))
}
