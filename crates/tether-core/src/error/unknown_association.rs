use super::Error;

/// Error when a row is asked for an association its model never declared.
#[derive(Debug)]
pub(super) struct UnknownAssociation {
    model: Box<str>,
    association: Box<str>,
}

impl std::error::Error for UnknownAssociation {}

impl core::fmt::Display for UnknownAssociation {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unknown association: model `{}` has no association `{}`",
            self.model, self.association
        )
    }
}

impl Error {
    /// Creates an unknown-association error.
    pub fn unknown_association(model: &str, association: &str) -> Error {
        Error::from(super::ErrorKind::UnknownAssociation(UnknownAssociation {
            model: model.into(),
            association: association.into(),
        }))
    }

    /// Returns `true` if this error is an unknown-association error.
    pub fn is_unknown_association(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnknownAssociation(_))
    }
}
