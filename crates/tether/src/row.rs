use crate::{Db, Result};

use tether_core::{
    driver::TxId,
    schema::ModelId,
    stmt::{Record, SaveOptions, Value},
};

/// One row of a model, as held by the application.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub(crate) model: ModelId,

    pub(crate) values: Record,

    /// Identifying columns as last persisted. `None` until the row is
    /// saved.
    pub(crate) key: Option<Record>,
}

impl Row {
    pub(crate) fn new(model: ModelId, values: Record) -> Row {
        Row {
            model,
            values,
            key: None,
        }
    }

    pub(crate) fn loaded(model: ModelId, identity: &[&str], values: Record) -> Row {
        let key = values.project(identity.iter().copied());

        Row {
            model,
            values,
            key: Some(key),
        }
    }

    pub fn model(&self) -> ModelId {
        self.model
    }

    /// Returns the value of `name`, `NULL` when the row holds none.
    pub fn get(&self, name: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.values.get(name).unwrap_or(&NULL)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.values.insert(name, value);
        self
    }

    pub fn values(&self) -> &Record {
        &self.values
    }

    /// True until the row has been saved or when it was never loaded from
    /// the store.
    pub fn is_new(&self) -> bool {
        self.key.is_none()
    }

    pub async fn save(&mut self, db: &Db, options: SaveOptions) -> Result<()> {
        db.save(self, options).await
    }

    pub async fn destroy(&self, db: &Db, transaction: Option<TxId>) -> Result<()> {
        db.destroy(self, transaction).await
    }
}

impl From<&Row> for ModelId {
    fn from(value: &Row) -> Self {
        value.model
    }
}
