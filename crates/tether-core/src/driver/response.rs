use super::TxId;
use crate::{err, stmt::Record, Result};

#[derive(Debug, Clone)]
pub struct Response {
    pub rows: Rows,
}

#[derive(Debug, Clone)]
pub enum Rows {
    /// Number of rows impacted by the operation
    Count(u64),

    /// Operation result, in store order
    Values(Vec<Record>),

    /// A transaction was started
    Transaction(TxId),
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self {
            rows: Rows::Count(count),
        }
    }

    pub fn values(values: impl Into<Vec<Record>>) -> Self {
        Self {
            rows: Rows::Values(values.into()),
        }
    }

    pub fn transaction(id: TxId) -> Self {
        Self {
            rows: Rows::Transaction(id),
        }
    }
}

impl Rows {
    pub fn is_count(&self) -> bool {
        matches!(self, Self::Count(_))
    }

    pub fn is_values(&self) -> bool {
        matches!(self, Self::Values(_))
    }

    pub fn into_count(self) -> Result<u64> {
        match self {
            Rows::Count(count) => Ok(count),
            _ => Err(err!("expected a row count, driver returned {self:?}")),
        }
    }

    pub fn into_values(self) -> Result<Vec<Record>> {
        match self {
            Rows::Values(values) => Ok(values),
            _ => Err(err!("expected rows, driver returned {self:?}")),
        }
    }

    pub fn into_transaction(self) -> Result<TxId> {
        match self {
            Rows::Transaction(id) => Ok(id),
            _ => Err(err!("expected a transaction id, driver returned {self:?}")),
        }
    }
}
