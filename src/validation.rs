//! Validation errors: recoverable problems in user input.
//! Each one names where it was found and which field to correct.

use itertools::Itertools;

/// A single validation failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Where the problem is, e.g. `boundary 'inlet'` or `physics`.
    pub context: String,
    /// Name of the offending field, e.g. `Pressure`.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}
impl ValidationError {
    pub fn new(context: &str, field: &str, message: &str) -> Self {
        ValidationError{
            context: context.to_string(),
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}
impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}: {}", self.context, self.field, self.message)
    }
}

/// Format a list of validation errors, one per line.
pub fn format_report(errors: &[ValidationError]) -> String {
    errors.iter().map(|error| format!("- {}", error)).join("\n")
}

/// Check whether any error names the given field.
pub fn names_field(errors: &[ValidationError], field: &str) -> bool {
    errors.iter().any(|error| error.field == field)
}
