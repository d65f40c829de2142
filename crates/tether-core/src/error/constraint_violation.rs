use super::Error;

/// Error when a write would break an integrity rule.
///
/// Raised for restricted deletes and key updates, references to rows that do
/// not exist, and `NULL` written into a column that does not allow it.
#[derive(Debug)]
pub(super) struct ConstraintViolation {
    message: Box<str>,
}

impl std::error::Error for ConstraintViolation {}

impl core::fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "constraint violation: {}", self.message)
    }
}

impl Error {
    /// Creates a constraint violation error.
    pub fn constraint_violation(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::ConstraintViolation(ConstraintViolation {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a constraint violation.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::ConstraintViolation(_))
    }
}
