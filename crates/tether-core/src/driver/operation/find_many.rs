use super::*;

use crate::{schema::ModelId, stmt};

#[derive(Debug, Clone)]
pub struct FindMany {
    /// Which model to query
    pub model: ModelId,

    /// Only return records matching the filter
    pub filter: stmt::Filter,

    /// Maximum number of records to return
    pub limit: Option<usize>,

    pub transaction: Option<TxId>,
}

impl From<FindMany> for Operation {
    fn from(value: FindMany) -> Self {
        Self::FindMany(value)
    }
}
