use super::Reference;
use crate::stmt::Type;

/// Column definition of a model attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Declared column type
    pub ty: Type,

    /// True if the attribute is part of the primary key
    pub primary_key: bool,

    /// True if the attribute may hold `NULL`
    pub nullable: bool,

    /// True if the store assigns the value on insert when none is given
    pub auto_increment: bool,

    /// Foreign-key reference, set when constraints are enabled for the
    /// association that injected this attribute
    pub references: Option<Reference>,
}

impl Attribute {
    pub fn new(ty: Type) -> Self {
        Self {
            ty,
            primary_key: false,
            nullable: true,
            auto_increment: false,
            references: None,
        }
    }

    /// Marks the attribute as (part of) the primary key. Key attributes are
    /// never nullable.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub fn is_foreign_key(&self) -> bool {
        self.references.is_some()
    }
}

impl From<Type> for Attribute {
    fn from(value: Type) -> Self {
        Attribute::new(value)
    }
}
