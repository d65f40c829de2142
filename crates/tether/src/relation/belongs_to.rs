use crate::{Db, Result, Row};

use tether_core::{
    schema::BelongsTo,
    stmt::{FindParams, SaveOptions},
    Error,
};

use log::trace;

impl Row {
    /// Loads the row this row refers to through the association `alias`.
    ///
    /// Returns `None` when the foreign key is `NULL` or references nothing.
    pub async fn related(
        &self,
        db: &Db,
        alias: &str,
        params: Option<FindParams>,
    ) -> Result<Option<Row>> {
        let belongs_to = self.association(db, alias)?;
        let (find, transaction) = belongs_to.find_target(db.schema(), &self.values, params);

        trace!("{}.related({alias}): {find:?}", belongs_to.alias);

        db.find(belongs_to.target, find, transaction).await
    }

    /// Points this row at `associated` through the association `alias`, or
    /// clears the reference when `associated` is `None`, and saves the
    /// foreign-key column.
    pub async fn set_related(
        &mut self,
        db: &Db,
        alias: &str,
        associated: Option<&Row>,
        options: Option<SaveOptions>,
    ) -> Result<()> {
        let belongs_to = self.association(db, alias)?;

        if let Some(associated) = associated {
            if associated.model != belongs_to.target {
                let schema = db.schema();
                tether_core::bail!(
                    "association `{}` of {} expects a {} row, got {}",
                    alias,
                    schema.model(self.model).name,
                    schema.model(belongs_to.target).name,
                    schema.model(associated.model).name,
                );
            }
        }

        let options = belongs_to.assign_target(
            db.schema(),
            &mut self.values,
            associated.map(|row| (row.model, &row.values)),
            options,
        );

        db.save(self, options).await
    }

    fn association<'a>(&self, db: &'a Db, alias: &str) -> Result<&'a BelongsTo> {
        let model = db.schema().model(self.model);

        model
            .association(alias)
            .or_else(|| {
                model
                    .associations()
                    .find(|belongs_to| belongs_to.alias == alias)
            })
            .ok_or_else(|| Error::unknown_association(&model.name, alias))
    }
}
