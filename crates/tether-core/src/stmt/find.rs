use super::{Filter, Value};
use crate::driver::TxId;

/// Criteria for locating a single row.
#[derive(Debug, Clone, PartialEq)]
pub enum Find {
    /// Shorthand for a lookup on the model's key column.
    Key(Value),

    /// Rows matching every condition of the filter.
    Filter(Filter),
}

impl Find {
    pub fn key(value: impl Into<Value>) -> Self {
        Self::Key(value.into())
    }
}

impl From<Filter> for Find {
    fn from(value: Filter) -> Self {
        Self::Filter(value)
    }
}

impl From<Value> for Find {
    fn from(value: Value) -> Self {
        Self::Key(value)
    }
}

/// Caller-supplied parameters for an association getter.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FindParams {
    /// Extra conditions, laid over the computed key condition.
    pub filter: Option<Filter>,

    /// Transaction the lookup runs in.
    pub transaction: Option<TxId>,
}

impl FindParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn transaction(mut self, transaction: impl Into<TxId>) -> Self {
        self.transaction = Some(transaction.into());
        self
    }
}
