use super::{fk, name, Attribute, Model, ModelDef, ModelId, ReferentialAction, Schema};
use crate::{
    driver::TxId,
    stmt::{Filter, Find, FindParams, Record, SaveOptions, Type, Value},
    Error, Result,
};
use log::{debug, trace};
use std::fmt;

/// Declares that rows of one model hold a foreign key referencing exactly
/// one row of another model.
#[derive(Debug, Clone, PartialEq)]
pub struct BelongsTo {
    /// Model holding the foreign key
    pub source: ModelId,

    /// Referenced model
    pub target: ModelId,

    /// True when source and target share a table
    pub is_self_association: bool,

    /// Application-facing name of the association
    pub alias: String,

    /// Key under which the association is registered on the source model
    pub association_accessor: String,

    /// Foreign-key column on the source model
    pub identifier: String,

    /// Camel-cased accessor method names
    pub accessors: Accessors,

    pub options: BelongsToOptions,
}

/// Options recognized when declaring a belongs-to association.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BelongsToOptions {
    /// Explicit foreign-key column name
    pub foreign_key: Option<String>,

    /// Explicit alias
    pub alias: Option<String>,

    /// Overrides the inferred foreign-key column type
    pub key_type: Option<Type>,

    pub on_delete: Option<ReferentialAction>,

    pub on_update: Option<ReferentialAction>,

    /// Whether saves issued by the setter run model hooks
    pub use_hooks: bool,

    /// Attach a foreign-key reference to the injected column even when no
    /// referential action is given
    pub foreign_key_constraint: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessors {
    pub get: String,
    pub set: String,
}

/// An association resolved from an accessor method name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Accessor<'a> {
    Get(&'a BelongsTo),
    Set(&'a BelongsTo),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssociationType {
    BelongsTo,
}

impl BelongsToOptions {
    pub fn foreign_key(mut self, foreign_key: impl Into<String>) -> Self {
        self.foreign_key = Some(foreign_key.into());
        self
    }

    /// Sets the alias the association is addressed by.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn key_type(mut self, ty: Type) -> Self {
        self.key_type = Some(ty);
        self
    }

    pub fn on_delete(mut self, action: ReferentialAction) -> Self {
        self.on_delete = Some(action);
        self
    }

    pub fn on_update(mut self, action: ReferentialAction) -> Self {
        self.on_update = Some(action);
        self
    }

    pub fn use_hooks(mut self, use_hooks: bool) -> Self {
        self.use_hooks = use_hooks;
        self
    }

    pub fn foreign_key_constraint(mut self, enabled: bool) -> Self {
        self.foreign_key_constraint = enabled;
        self
    }
}

impl BelongsTo {
    pub fn new(source: &ModelDef, target: &ModelDef, mut options: BelongsToOptions) -> BelongsTo {
        // An empty alias is the same as none at all
        options.alias = options.alias.take().filter(|alias| !alias.is_empty());
        options.foreign_key = options.foreign_key.take().filter(|key| !key.is_empty());

        let is_self_association = source.table() == target.table();

        let identifier = match (&options.foreign_key, &options.alias) {
            (Some(foreign_key), _) => foreign_key.clone(),
            (None, Some(_)) if is_self_association => foreign_key_for(source, source),
            (None, _) => foreign_key_for(target, source),
        };

        let alias = match &options.alias {
            Some(alias) => alias.clone(),
            None => name::singularize(target.table(), &target.options.language),
        };

        let association_accessor = if is_self_association {
            name::combine_table_names(target.table(), &alias)
        } else {
            alias.clone()
        };

        let accessors = Accessors {
            get: name::camelize(&format!("get_{alias}")),
            set: name::camelize(&format!("set_{alias}")),
        };

        debug!(
            "{} belongs to {} as `{}` (foreign key `{}`)",
            source.name, target.name, alias, identifier
        );

        BelongsTo {
            source: source.id,
            target: target.id,
            is_self_association,
            alias,
            association_accessor,
            identifier,
            accessors,
            options,
        }
    }

    pub fn association_type(&self) -> AssociationType {
        AssociationType::BelongsTo
    }

    /// A belongs-to association yields at most one related row.
    pub fn is_single_association(&self) -> bool {
        true
    }

    pub fn source<'a>(&self, schema: &'a Schema) -> &'a Model {
        schema.model(self.source)
    }

    pub fn target<'a>(&self, schema: &'a Schema) -> &'a Model {
        schema.model(self.target)
    }

    /// Adds the foreign-key column to the source model.
    ///
    /// An attribute that already carries the column name is left untouched.
    /// The source model's attributes are refreshed either way, so calling
    /// this more than once is harmless.
    pub fn inject_attributes(&self, models: &mut [ModelDef]) -> Result<&Self> {
        let attribute = {
            let target = lookup(models, self.target)?;
            let source = lookup(models, self.source)?;

            let inferred = match target.primary_keys() {
                [key] => target.attributes[key].ty,
                _ => Type::Integer,
            };

            let attribute = Attribute::new(self.options.key_type.unwrap_or(inferred));
            fk::annotate(attribute, target, source, &self.options)
        };

        let source = &mut models[self.source.0];

        if source.attributes.contains_key(&self.identifier) {
            debug!(
                "{}.{} already defined, keeping existing attribute",
                source.name, self.identifier
            );
        } else {
            source.attributes.insert(self.identifier.clone(), attribute);
        }

        source.refresh_attributes();

        Ok(self)
    }

    /// Builds the lookup for the row `source` refers to.
    ///
    /// Without params the bare foreign-key value is used as a key lookup.
    /// With params the key binding is combined with the caller's filter, the
    /// caller's conditions winning on conflict, and the caller's transaction
    /// is passed through.
    pub fn find_target(
        &self,
        schema: &Schema,
        source: &Record,
        params: Option<FindParams>,
    ) -> (Find, Option<TxId>) {
        let value = source.get(&self.identifier).cloned().unwrap_or_default();

        trace!("{}: find target for {} = {}", self.alias, self.identifier, value);

        let Some(params) = params else {
            return (Find::key(value), None);
        };

        let mut filter = Filter::eq(schema.key_column(self.target), value);

        if let Some(overlay) = params.filter {
            filter.extend(overlay);
        }

        (Find::Filter(filter), params.transaction)
    }

    /// Points `source` at `associated`, or clears the foreign key when there
    /// is nothing to associate, and returns the options the change must be
    /// saved with.
    ///
    /// The save is restricted to the foreign-key column and allows it to be
    /// `NULL`. Options given by the caller take precedence.
    pub fn assign_target(
        &self,
        schema: &Schema,
        source: &mut Record,
        associated: Option<(ModelId, &Record)>,
        options: Option<SaveOptions>,
    ) -> SaveOptions {
        let value = match associated {
            Some((model, record)) => record
                .get(schema.key_column(model))
                .cloned()
                .unwrap_or_default(),
            None => Value::Null,
        };

        trace!("{}: assign {} = {}", self.alias, self.identifier, value);

        source.insert(self.identifier.clone(), value);

        let defaults = SaveOptions::new()
            .fields([self.identifier.clone()])
            .allow_null([self.identifier.clone()])
            .hooks(self.options.use_hooks);

        options.unwrap_or_default().or(defaults)
    }
}

impl AssociationType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AssociationType::BelongsTo => "BelongsTo",
        }
    }
}

impl fmt::Display for AssociationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'a> Accessor<'a> {
    pub fn association(&self) -> &'a BelongsTo {
        match *self {
            Accessor::Get(belongs_to) | Accessor::Set(belongs_to) => belongs_to,
        }
    }
}

/// `singularize(model.table) + "Id"`, snake-cased when `source` uses
/// underscored names.
fn foreign_key_for(model: &ModelDef, source: &ModelDef) -> String {
    let singular = name::singularize(model.table(), &model.options.language);
    name::underscored_if(&format!("{singular}Id"), source.options.underscored)
}

fn lookup(models: &[ModelDef], id: ModelId) -> Result<&ModelDef> {
    models
        .get(id.0)
        .ok_or_else(|| Error::invalid_schema(format!("no model registered for {id:?}")))
}
