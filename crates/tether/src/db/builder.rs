use super::Db;
use crate::Result;

use tether_core::{
    driver::Driver,
    schema::{self, BelongsToOptions, ModelDef, Schema},
};

#[derive(Debug, Default)]
pub struct Builder {
    /// Schema builder
    core: schema::Builder,
}

impl Builder {
    pub fn define(&mut self, model: ModelDef) -> &mut Self {
        self.core.define(model);
        self
    }

    /// Declares that rows of `source` reference one row of `target`.
    pub fn belongs_to(
        &mut self,
        source: &str,
        target: &str,
        options: BelongsToOptions,
    ) -> &mut Self {
        self.core.belongs_to(source, target, options);
        self
    }

    /// Key column used when a target model has no single primary key.
    /// Defaults to `id`.
    pub fn default_key_column(&mut self, column: &str) -> &mut Self {
        self.core.default_key_column(column);
        self
    }

    pub fn build_schema(&self) -> Result<Schema> {
        self.core.build()
    }

    pub async fn build(&mut self, mut driver: impl Driver) -> Result<Db> {
        let schema = self.build_schema()?;

        driver.register_schema(&schema).await?;

        Ok(Db::new(schema, Box::new(driver)))
    }
}
