mod delete_by_key;
pub use delete_by_key::DeleteByKey;

mod find_many;
pub use find_many::FindMany;

mod insert;
pub use insert::Insert;

mod transaction;
pub use transaction::Transaction;

mod update_by_key;
pub use update_by_key::UpdateByKey;

use super::*;

#[derive(Debug, Clone)]
pub enum Operation {
    /// Create a new record
    Insert(Insert),

    /// Delete the record identified by the given key
    DeleteByKey(DeleteByKey),

    /// Query the table, filtering by column values
    FindMany(FindMany),

    /// Execute a transaction lifecycle op
    Transaction(Transaction),

    /// Update a record by its key
    UpdateByKey(UpdateByKey),
}

impl Operation {
    /// The transaction a data operation runs in. Lifecycle ops report the
    /// transaction they act on.
    pub fn transaction(&self) -> Option<TxId> {
        match self {
            Operation::Insert(op) => op.transaction,
            Operation::DeleteByKey(op) => op.transaction,
            Operation::FindMany(op) => op.transaction,
            Operation::UpdateByKey(op) => op.transaction,
            Operation::Transaction(Transaction::Begin) => None,
            Operation::Transaction(Transaction::Commit(id) | Transaction::Rollback(id)) => {
                Some(*id)
            }
        }
    }
}
