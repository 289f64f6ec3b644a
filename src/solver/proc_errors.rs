/// Solver process error type.
#[derive(Debug)]
pub enum SolverError {
    /// The solver binary could not be found.
    NotFound(String),
    /// The solver ran but exited with a non-zero code.
    ExitStatus {
        code: i32,
        /// Last lines the solver wrote to stderr.
        stderr: String,
    },
    /// IO error while talking to the process.
    Io(std::io::Error),
    /// StringOnly error.
    StringOnly(String),
}
impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverError::NotFound(program) => write!(f, "- Solver binary \"{}\" not found; is the solver environment loaded?", program),
            SolverError::ExitStatus{code, stderr} if stderr.is_empty() => write!(f, "- Solver exited with code {}", code),
            SolverError::ExitStatus{code, stderr} => write!(f, "- Solver exited with code {}:\n{}", code, stderr),
            SolverError::Io(error) => write!(f, "- IO Error:\n{}", error),
            SolverError::StringOnly(error) => write!(f, "- {}", error),
        }
    }
}
impl From<std::io::Error> for SolverError {
    fn from(error: std::io::Error) -> Self {
        SolverError::Io(error)
    }
}
impl From<String> for SolverError {
    fn from(error: String) -> Self {
        SolverError::StringOnly(error)
    }
}

/// Result type for the `solver` module.
pub type ProcResult<T> = std::result::Result<T, SolverError>;

/// Create a `SolverError::StringOnly` from a string.
pub fn err_str<T>(error_str: &str) -> ProcResult<T> {
    Err(SolverError::StringOnly(error_str.to_string()))
}
