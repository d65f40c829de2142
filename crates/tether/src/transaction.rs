use crate::{Db, Result};

use tether_core::driver::{operation, TxId};

use log::debug;

/// An open transaction.
///
/// Operations join the transaction by passing its id. If dropped without
/// calling [`commit`](Self::commit) or [`rollback`](Self::rollback), the
/// transaction is rolled back in the background.
#[derive(Debug)]
pub struct Transaction {
    db: Db,

    id: TxId,

    /// Whether commit or rollback has been called.
    finished: bool,
}

impl Transaction {
    pub(crate) async fn begin(db: &Db) -> Result<Transaction> {
        let id = db
            .exec(operation::Transaction::Begin)
            .await?
            .rows
            .into_transaction()?;

        debug!("transaction {id} started");

        Ok(Transaction {
            db: db.clone(),
            id,
            finished: false,
        })
    }

    pub fn id(&self) -> TxId {
        self.id
    }

    pub async fn commit(mut self) -> Result<()> {
        self.finished = true;
        self.db
            .exec(operation::Transaction::Commit(self.id))
            .await?;
        debug!("transaction {} committed", self.id);
        Ok(())
    }

    pub async fn rollback(mut self) -> Result<()> {
        self.finished = true;
        self.db
            .exec(operation::Transaction::Rollback(self.id))
            .await?;
        debug!("transaction {} rolled back", self.id);
        Ok(())
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if self.finished {
            return;
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };

        let db = self.db.clone();
        let id = self.id;
        runtime.spawn(async move {
            let _ = db.exec(operation::Transaction::Rollback(id)).await;
        });
    }
}

impl From<&Transaction> for TxId {
    fn from(value: &Transaction) -> Self {
        value.id
    }
}
