use super::*;

use crate::{schema::ModelId, stmt};

#[derive(Debug, Clone)]
pub struct UpdateByKey {
    /// Which model to update
    pub model: ModelId,

    /// Values of the identifying columns. A `NULL` in any of them matches
    /// nothing.
    pub key: stmt::Record,

    /// Columns to assign. Other columns are left untouched.
    pub assignments: stmt::Record,

    pub transaction: Option<TxId>,
}

impl From<UpdateByKey> for Operation {
    fn from(value: UpdateByKey) -> Self {
        Self::UpdateByKey(value)
    }
}
