//! An in-process driver keeping every table in memory.
//!
//! Transactions work on a snapshot of the committed tables and record every
//! write they make. Committing replays those writes onto the committed
//! tables and fails, changing nothing, if one of them no longer applies.
//! Rolling back discards the snapshot. Columns carrying a
//! foreign-key reference are checked on every write, and deleting or
//! re-keying a referenced row applies the reference's ON DELETE / ON UPDATE
//! action.

mod op;
mod table;
use table::Tables;

use log::{debug, trace};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tether_core::{
    async_trait,
    driver::{
        operation::{Insert, Transaction},
        Driver, Operation, Response, Rows, TxId,
    },
    Error, Result, Schema,
};

#[derive(Debug, Default)]
pub struct Memory {
    store: Mutex<Store>,
}

#[derive(Debug, Default)]
struct Store {
    committed: Tables,

    /// Open transactions
    transactions: HashMap<TxId, OpenTransaction>,

    /// Last issued transaction id
    last_tx: u64,
}

#[derive(Debug)]
struct OpenTransaction {
    /// The committed tables as of `Begin`, with this transaction's writes
    tables: Tables,

    /// Writes to replay on commit, in execution order
    log: Vec<Operation>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Driver for Memory {
    async fn register_schema(&mut self, schema: &Schema) -> Result<()> {
        let store = self.store.get_mut().unwrap_or_else(PoisonError::into_inner);

        for model in schema.models() {
            debug!("create table {} for {}", model.table, model.name);
            store.committed.create(&model.table);
        }

        Ok(())
    }

    async fn exec(&self, schema: &Arc<Schema>, op: Operation) -> Result<Response> {
        trace!("memory: {op:?}");

        let mut store = self.lock();

        match op {
            Operation::Transaction(op) => store.transaction(schema, op),
            Operation::FindMany(op) => op::find_many(schema, store.tables(op.transaction)?, op),
            op => store.write(schema, op),
        }
    }
}

impl Store {
    fn tables(&self, transaction: Option<TxId>) -> Result<&Tables> {
        match transaction {
            Some(id) => Ok(&self.open(id)?.tables),
            None => Ok(&self.committed),
        }
    }

    fn open(&self, id: TxId) -> Result<&OpenTransaction> {
        self.transactions
            .get(&id)
            .ok_or_else(|| Error::transaction_not_open(id.0))
    }

    /// Applies a write to a copy of the tables and keeps the copy only if the
    /// write succeeds. Writes inside a transaction are also logged for
    /// commit.
    fn write(&mut self, schema: &Schema, op: Operation) -> Result<Response> {
        let Some(id) = op.transaction() else {
            let mut work = self.committed.clone();
            let response = op::write(schema, &mut work, op)?;
            self.committed = work;
            return Ok(response);
        };

        let transaction = self
            .transactions
            .get_mut(&id)
            .ok_or_else(|| Error::transaction_not_open(id.0))?;

        let mut work = transaction.tables.clone();
        let response = op::write(schema, &mut work, op.clone())?;
        transaction.tables = work;
        transaction.log.push(replayable(op, &response));

        Ok(response)
    }

    fn transaction(&mut self, schema: &Schema, op: Transaction) -> Result<Response> {
        match op {
            Transaction::Begin => {
                self.last_tx += 1;
                let id = TxId(self.last_tx);

                self.transactions.insert(
                    id,
                    OpenTransaction {
                        tables: self.committed.clone(),
                        log: vec![],
                    },
                );
                Ok(Response::transaction(id))
            }
            Transaction::Commit(id) => {
                let transaction = self
                    .transactions
                    .remove(&id)
                    .ok_or_else(|| Error::transaction_not_open(id.0))?;

                let mut work = self.committed.clone();
                for op in transaction.log {
                    op::write(schema, &mut work, op).map_err(|err| {
                        debug!("transaction {id} failed to commit: {err}");
                        err.context(tether_core::err!("transaction {id} cannot be committed"))
                    })?;
                }

                self.committed = work;
                Ok(Response::count(0))
            }
            Transaction::Rollback(id) => {
                self.transactions
                    .remove(&id)
                    .ok_or_else(|| Error::transaction_not_open(id.0))?;

                Ok(Response::count(0))
            }
        }
    }
}

/// The form of a write to replay on commit. Inserts are replayed with the
/// values the store assigned, so rows keep the keys the application saw.
fn replayable(op: Operation, response: &Response) -> Operation {
    match (op, &response.rows) {
        (Operation::Insert(insert), Rows::Values(records)) if !records.is_empty() => Insert {
            values: records[0].clone(),
            ..insert
        }
        .into(),
        (op, _) => op,
    }
}
