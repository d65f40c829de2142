use super::Error;

/// Error when an operation names a transaction the driver does not know,
/// usually because it was already committed or rolled back.
#[derive(Debug)]
pub(super) struct TransactionError {
    id: u64,
}

impl std::error::Error for TransactionError {}

impl core::fmt::Display for TransactionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "transaction {} is not open", self.id)
    }
}

impl Error {
    pub fn transaction_not_open(id: u64) -> Error {
        Error::from(super::ErrorKind::Transaction(TransactionError { id }))
    }

    pub fn is_transaction_not_open(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Transaction(_))
    }
}
