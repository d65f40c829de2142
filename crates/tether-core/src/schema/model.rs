use super::{name, Accessor, Attribute, BelongsTo};
use crate::stmt::Type;
use indexmap::IndexMap;
use std::fmt;

/// Per-model configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelOptions {
    /// Explicit table identifier. Derived from the model name when unset.
    pub table_name: Option<String>,

    /// Use the model name as table identifier instead of its plural.
    pub freeze_table_name: bool,

    /// Snake-case derived column names (`user_id` instead of `UserId`).
    pub underscored: bool,

    /// Language used for inflection.
    pub language: String,

    /// Add an auto-increment key column when no primary key is declared.
    pub implicit_primary_key: bool,
}

/// A model declaration, mutable until the schema is built.
#[derive(Debug, Clone)]
pub struct ModelDef {
    /// Assigned when the model is registered with a schema builder
    pub id: ModelId,

    pub name: String,

    /// Attribute definitions, in declaration order
    pub attributes: IndexMap<String, Attribute>,

    pub options: ModelOptions,

    table: String,

    /// Cached by `refresh_attributes`
    primary_keys: Vec<String>,
}

/// A finalized model. Immutable once the schema has been built.
#[derive(Debug, Clone)]
pub struct Model {
    /// Uniquely identifies the model within the schema
    pub id: ModelId,

    pub name: String,

    /// Table identifier
    pub table: String,

    pub attributes: IndexMap<String, Attribute>,

    /// Names of the primary key attributes. Empty if the model has none.
    pub primary_key: Vec<String>,

    /// Belongs-to associations keyed by association accessor, in
    /// declaration order
    pub associations: IndexMap<String, BelongsTo>,

    pub options: ModelOptions,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ModelId(pub usize);

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            table_name: None,
            freeze_table_name: false,
            underscored: false,
            language: "en".to_string(),
            implicit_primary_key: true,
        }
    }
}

impl ModelOptions {
    pub fn table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    pub fn freeze_table_name(mut self, freeze: bool) -> Self {
        self.freeze_table_name = freeze;
        self
    }

    pub fn underscored(mut self, underscored: bool) -> Self {
        self.underscored = underscored;
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn implicit_primary_key(mut self, implicit: bool) -> Self {
        self.implicit_primary_key = implicit;
        self
    }
}

impl ModelDef {
    pub fn new(name: impl Into<String>) -> Self {
        let mut model = Self {
            id: ModelId::placeholder(),
            name: name.into(),
            attributes: IndexMap::new(),
            options: ModelOptions::default(),
            table: String::new(),
            primary_keys: vec![],
        };
        model.table = model.derive_table();
        model
    }

    pub fn attribute(mut self, name: impl Into<String>, attribute: impl Into<Attribute>) -> Self {
        self.attributes.insert(name.into(), attribute.into());
        self.refresh_attributes();
        self
    }

    pub fn options(mut self, options: ModelOptions) -> Self {
        self.options = options;
        self.table = self.derive_table();
        self
    }

    /// Table identifier
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn primary_keys(&self) -> &[String] {
        &self.primary_keys
    }

    pub fn has_primary_keys(&self) -> bool {
        !self.primary_keys.is_empty()
    }

    /// Recomputes the attribute-derived state after `attributes` changed.
    /// Safe to call any number of times.
    pub fn refresh_attributes(&mut self) {
        self.primary_keys = self
            .attributes
            .iter()
            .filter(|(_, attribute)| attribute.primary_key)
            .map(|(name, _)| name.clone())
            .collect();
    }

    /// Adds an auto-increment integer key named `column` in front of the
    /// other attributes, unless the model declares its own primary key or
    /// opted out.
    pub(crate) fn add_implicit_primary_key(&mut self, column: &str) {
        if self.has_primary_keys()
            || !self.options.implicit_primary_key
            || self.attributes.contains_key(column)
        {
            return;
        }

        let mut attributes = IndexMap::with_capacity(self.attributes.len() + 1);
        attributes.insert(
            column.to_string(),
            Attribute::new(Type::Integer).primary_key().auto_increment(),
        );
        attributes.extend(self.attributes.drain(..));
        self.attributes = attributes;
        self.refresh_attributes();
    }

    pub(crate) fn finalize(self, associations: IndexMap<String, BelongsTo>) -> Model {
        Model {
            id: self.id,
            name: self.name,
            table: self.table,
            attributes: self.attributes,
            primary_key: self.primary_keys,
            associations,
            options: self.options,
        }
    }

    fn derive_table(&self) -> String {
        match &self.options.table_name {
            Some(table_name) => table_name.clone(),
            None if self.options.freeze_table_name => self.name.clone(),
            None => name::pluralize(&self.name, &self.options.language),
        }
    }
}

impl Model {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn has_primary_keys(&self) -> bool {
        !self.primary_key.is_empty()
    }

    /// The column that identifies one row: the primary key when there is
    /// exactly one, `fallback` otherwise.
    pub fn key_column<'a>(&'a self, fallback: &'a str) -> &'a str {
        match &self.primary_key[..] {
            [key] => key,
            _ => fallback,
        }
    }

    /// The columns whose values together identify one stored row: every
    /// primary key column, or `fallback` for models without one.
    pub fn identity_columns<'a>(&'a self, fallback: &'a str) -> Vec<&'a str> {
        if self.primary_key.is_empty() {
            vec![fallback]
        } else {
            self.primary_key.iter().map(String::as_str).collect()
        }
    }

    pub fn associations(&self) -> impl Iterator<Item = &BelongsTo> + '_ {
        self.associations.values()
    }

    /// Looks up an association by its association accessor.
    pub fn association(&self, accessor: &str) -> Option<&BelongsTo> {
        self.associations.get(accessor)
    }

    /// Resolves a camel-cased accessor method name, such as `getUser` or
    /// `setPrimaryUsers`, to the association it belongs to.
    pub fn accessor(&self, method: &str) -> Option<Accessor<'_>> {
        self.associations().find_map(|belongs_to| {
            if belongs_to.accessors.get == method {
                Some(Accessor::Get(belongs_to))
            } else if belongs_to.accessors.set == method {
                Some(Accessor::Set(belongs_to))
            } else {
                None
            }
        })
    }
}

impl ModelId {
    pub(crate) const fn placeholder() -> Self {
        Self(usize::MAX)
    }
}

impl fmt::Debug for ModelId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ModelId({})", self.0)
    }
}
