mod builder;
pub use builder::Builder;

use crate::{Row, Transaction};

use tether_core::{
    driver::{
        operation::{DeleteByKey, FindMany, Insert, UpdateByKey},
        Driver, Operation, Response, TxId,
    },
    schema::{Model, ModelId},
    stmt::{Filter, Find, Record, SaveOptions, Value},
    Error, Result, Schema,
};

use log::trace;
use std::{fmt, sync::Arc};

/// A database handle. Cloning is cheap; all clones share the schema and the
/// driver.
#[derive(Clone)]
pub struct Db {
    shared: Arc<Shared>,
}

struct Shared {
    schema: Arc<Schema>,
    driver: Box<dyn Driver>,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub(crate) fn new(schema: Schema, driver: Box<dyn Driver>) -> Db {
        Db {
            shared: Arc::new(Shared {
                schema: Arc::new(schema),
                driver,
            }),
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.shared.schema
    }

    /// Looks up a model by name.
    pub fn model(&self, name: &str) -> Result<&Model> {
        self.shared
            .schema
            .model_by_name(name)
            .ok_or_else(|| tether_core::err!("unknown model `{name}`"))
    }

    /// Execute a database operation
    pub(crate) async fn exec(&self, op: impl Into<Operation>) -> Result<Response> {
        let op = op.into();
        trace!("exec {op:?}");
        self.shared.driver.exec(&self.shared.schema, op).await
    }

    /// Creates an unsaved row of the named model.
    pub fn build(&self, model: &str, values: impl Into<Record>) -> Result<Row> {
        Ok(Row::new(self.model(model)?.id, values.into()))
    }

    /// Creates and saves a row of the named model.
    pub async fn create(
        &self,
        model: &str,
        values: impl Into<Record>,
        transaction: Option<TxId>,
    ) -> Result<Row> {
        let mut row = self.build(model, values)?;

        let mut options = SaveOptions::new();
        options.transaction = transaction;

        self.save(&mut row, options).await?;
        Ok(row)
    }

    /// Finds the first row of `model` matching `find`.
    ///
    /// A key lookup is a lookup on the model's key column. A `NULL` key
    /// matches nothing.
    pub async fn find(
        &self,
        model: impl Into<ModelId>,
        find: impl Into<Find>,
        transaction: Option<TxId>,
    ) -> Result<Option<Row>> {
        let model = model.into();

        let filter = match find.into() {
            Find::Key(key) => Filter::eq(self.schema().key_column(model), key),
            Find::Filter(filter) => filter,
        };

        let rows = self.query(model, filter, Some(1), transaction).await?;
        Ok(rows.into_iter().next())
    }

    /// Returns every row of `model` matching `filter`, in store order.
    pub async fn find_all(
        &self,
        model: impl Into<ModelId>,
        filter: Filter,
        transaction: Option<TxId>,
    ) -> Result<Vec<Row>> {
        self.query(model.into(), filter, None, transaction).await
    }

    /// Persists `row`.
    ///
    /// Rows loaded from the store are updated by key, others are inserted.
    /// When `fields` is set only those attributes are written. Writing `NULL`
    /// into a non-nullable attribute fails unless the attribute is listed in
    /// `allow_null`.
    pub async fn save(&self, row: &mut Row, options: SaveOptions) -> Result<()> {
        let schema = self.schema();
        let model = schema.model(row.model);
        let identity = schema.identity_columns(model);

        let fields: Vec<&str> = match &options.fields {
            Some(fields) => fields
                .iter()
                .map(String::as_str)
                .filter(|name| model.attributes.contains_key(*name))
                .collect(),
            None => model.attributes.keys().map(String::as_str).collect(),
        };

        let is_new = row.is_new();
        validate(model, row.values(), &fields, is_new, &options)?;

        let values = row.values().project(fields.iter().copied());

        match row.key.clone() {
            Some(key) => {
                let count = self
                    .exec(UpdateByKey {
                        model: model.id,
                        key: key.clone(),
                        assignments: values,
                        transaction: options.transaction,
                    })
                    .await?
                    .rows
                    .into_count()?;

                if count == 0 {
                    return Err(Error::record_not_found(format!(
                        "table={} key={}",
                        model.table, key
                    )));
                }

                if fields.iter().any(|field| identity.contains(field)) {
                    row.key = Some(row.values().project(identity.iter().copied()));
                }
            }
            None => {
                let inserted = self
                    .exec(Insert {
                        model: model.id,
                        values,
                        transaction: options.transaction,
                    })
                    .await?
                    .rows
                    .into_values()?;

                let Some(inserted) = inserted.into_iter().next() else {
                    tether_core::bail!("insert into {} returned no record", model.table);
                };

                row.values.merge(&inserted);
                row.key = Some(inserted.project(identity.iter().copied()));
            }
        }

        Ok(())
    }

    /// Deletes `row` from the store.
    pub async fn destroy(&self, row: &Row, transaction: Option<TxId>) -> Result<()> {
        let model = self.schema().model(row.model);

        let Some(key) = row.key.clone() else {
            return Err(Error::record_not_found(format!(
                "{} row was never saved",
                model.name
            )));
        };

        let count = self
            .exec(DeleteByKey {
                model: model.id,
                key: key.clone(),
                transaction,
            })
            .await?
            .rows
            .into_count()?;

        if count == 0 {
            return Err(Error::record_not_found(format!(
                "table={} key={}",
                model.table, key
            )));
        }

        Ok(())
    }

    /// Starts a transaction.
    pub async fn transaction(&self) -> Result<Transaction> {
        Transaction::begin(self).await
    }

    async fn query(
        &self,
        model: ModelId,
        filter: Filter,
        limit: Option<usize>,
        transaction: Option<TxId>,
    ) -> Result<Vec<Row>> {
        let identity = self.schema().identity_columns(model);

        let records = self
            .exec(FindMany {
                model,
                filter,
                limit,
                transaction,
            })
            .await?
            .rows
            .into_values()?;

        Ok(records
            .into_iter()
            .map(|record| Row::loaded(model, &identity, record))
            .collect())
    }
}

fn validate(
    model: &Model,
    values: &Record,
    fields: &[&str],
    is_new: bool,
    options: &SaveOptions,
) -> Result<()> {
    for name in fields {
        let attribute = &model.attributes[*name];
        let value = values.get(name).unwrap_or(&Value::Null);

        if value.is_null() {
            let assigned_on_insert = is_new && attribute.auto_increment;

            if !attribute.nullable && !assigned_on_insert && !options.allows_null(name) {
                return Err(Error::constraint_violation(format!(
                    "{}.{} cannot be null",
                    model.name, name
                )));
            }
        } else if !attribute.ty.accepts(value) {
            return Err(Error::constraint_violation(format!(
                "{}.{}: `{}` is not a valid {}",
                model.name, name, value, attribute.ty
            )));
        }
    }

    Ok(())
}

impl fmt::Debug for Db {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("Db")
            .field("driver", &self.shared.driver)
            .finish_non_exhaustive()
    }
}
