use super::*;

use crate::{schema::ModelId, stmt};

#[derive(Debug, Clone)]
pub struct Insert {
    /// Model the record belongs to
    pub model: ModelId,

    /// Values to insert. Auto-increment keys left out are assigned by the
    /// driver.
    pub values: stmt::Record,

    pub transaction: Option<TxId>,
}

impl From<Insert> for Operation {
    fn from(value: Insert) -> Self {
        Self::Insert(value)
    }
}
