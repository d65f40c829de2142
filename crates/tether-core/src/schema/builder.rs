use super::{BelongsTo, BelongsToOptions, ModelDef, ModelId, Schema};
use crate::{Error, Result};
use indexmap::IndexMap;
use log::debug;

/// Collects model and association declarations, then turns them into an
/// immutable [`Schema`].
#[derive(Debug, Clone)]
pub struct Builder {
    /// Key column used when a target has no single primary key
    default_key_column: String,

    /// Declared models, in declaration order
    models: Vec<ModelDef>,

    /// Declared associations, in declaration order
    associations: Vec<Declaration>,
}

#[derive(Debug, Clone)]
struct Declaration {
    source: String,
    target: String,
    options: BelongsToOptions,
}

impl Builder {
    pub fn new() -> Self {
        Self {
            default_key_column: "id".to_string(),
            models: vec![],
            associations: vec![],
        }
    }

    pub fn default_key_column(&mut self, column: &str) -> &mut Self {
        self.default_key_column = column.to_string();
        self
    }

    pub fn define(&mut self, model: ModelDef) -> &mut Self {
        self.models.push(model);
        self
    }

    /// Declares that `source` belongs to `target`. Both are model names.
    pub fn belongs_to(
        &mut self,
        source: impl Into<String>,
        target: impl Into<String>,
        options: BelongsToOptions,
    ) -> &mut Self {
        self.associations.push(Declaration {
            source: source.into(),
            target: target.into(),
            options,
        });
        self
    }

    pub fn build(&self) -> Result<Schema> {
        let mut models = self.models.clone();

        let mut lookup = IndexMap::with_capacity(models.len());
        for (index, model) in models.iter_mut().enumerate() {
            model.id = ModelId(index);

            if lookup.insert(model.name.clone(), model.id).is_some() {
                return Err(Error::invalid_schema(format!(
                    "model `{}` defined more than once",
                    model.name
                )));
            }

            model.add_implicit_primary_key(&self.default_key_column);
        }

        let mut associations: Vec<IndexMap<String, BelongsTo>> =
            models.iter().map(|_| IndexMap::new()).collect();

        for declaration in &self.associations {
            let source = resolve(&lookup, &declaration.source)?;
            let target = resolve(&lookup, &declaration.target)?;

            let belongs_to = BelongsTo::new(
                &models[source.0],
                &models[target.0],
                declaration.options.clone(),
            );
            belongs_to.inject_attributes(&mut models)?;

            let registered = &mut associations[source.0];
            if registered.contains_key(&belongs_to.association_accessor) {
                return Err(Error::invalid_schema(format!(
                    "model `{}` already has an association `{}`",
                    declaration.source, belongs_to.association_accessor
                )));
            }
            registered.insert(belongs_to.association_accessor.clone(), belongs_to);
        }

        let models = models
            .into_iter()
            .zip(associations)
            .map(|(model, associations)| {
                let model = model.finalize(associations);
                debug!(
                    "model {} ({}): attributes={:?} associations={:?}",
                    model.name,
                    model.table,
                    model.attributes.keys().collect::<Vec<_>>(),
                    model.associations.keys().collect::<Vec<_>>(),
                );
                (model.id, model)
            })
            .collect();

        Ok(Schema {
            models,
            default_key_column: self.default_key_column.clone(),
        })
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve(lookup: &IndexMap<String, ModelId>, name: &str) -> Result<ModelId> {
    lookup
        .get(name)
        .copied()
        .ok_or_else(|| Error::invalid_schema(format!("model `{name}` is not defined")))
}
