mod attribute;
pub use attribute::Attribute;

mod belongs_to;
pub use belongs_to::{Accessor, Accessors, AssociationType, BelongsTo, BelongsToOptions};

mod builder;
pub use builder::Builder;

pub mod fk;
pub use fk::{Reference, ReferentialAction};

mod model;
pub use model::{Model, ModelDef, ModelId, ModelOptions};

pub mod name;

use indexmap::IndexMap;

/// The finalized set of models. Immutable once built.
#[derive(Debug)]
pub struct Schema {
    pub models: IndexMap<ModelId, Model>,

    /// Key column used for targets without exactly one primary key
    default_key_column: String,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Get a model by ID
    pub fn model(&self, id: impl Into<ModelId>) -> &Model {
        self.models.get(&id.into()).expect("invalid model ID")
    }

    pub fn model_by_name(&self, name: &str) -> Option<&Model> {
        self.models.values().find(|model| model.name == name)
    }

    pub fn models(&self) -> impl Iterator<Item = &Model> {
        self.models.values()
    }

    pub fn default_key_column(&self) -> &str {
        &self.default_key_column
    }

    /// Column identifying a single row of the given model.
    pub fn key_column(&self, id: impl Into<ModelId>) -> &str {
        self.model(id).key_column(&self.default_key_column)
    }

    /// Columns whose values together identify a stored row of the given
    /// model.
    pub fn identity_columns(&self, id: impl Into<ModelId>) -> Vec<&str> {
        self.model(id).identity_columns(&self.default_key_column)
    }
}

impl From<&Model> for ModelId {
    fn from(value: &Model) -> Self {
        value.id
    }
}

impl From<&ModelDef> for ModelId {
    fn from(value: &ModelDef) -> Self {
        value.id
    }
}
