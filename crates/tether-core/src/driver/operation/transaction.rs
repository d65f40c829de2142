use super::{Operation, TxId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transaction {
    /// Start a transaction. The response carries the new transaction's id.
    Begin,

    /// Commit a transaction
    Commit(TxId),

    /// Rollback a transaction
    Rollback(TxId),
}

impl From<Transaction> for Operation {
    fn from(value: Transaction) -> Operation {
        Operation::Transaction(value)
    }
}
