use super::*;
use crate::{schema::ModelId, stmt};

#[derive(Debug, Clone)]
pub struct DeleteByKey {
    /// Which model to delete from
    pub model: ModelId,

    /// Values of the identifying columns
    pub key: stmt::Record,

    pub transaction: Option<TxId>,
}

impl From<DeleteByKey> for Operation {
    fn from(value: DeleteByKey) -> Self {
        Self::DeleteByKey(value)
    }
}
