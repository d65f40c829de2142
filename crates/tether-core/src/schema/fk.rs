//! Foreign-key constraint metadata attached to injected attributes.

use super::{Attribute, BelongsToOptions, ModelDef};
use crate::{Error, Result};
use log::debug;
use std::{fmt, str::FromStr};

/// Referential action for foreign key constraints (ON DELETE / ON UPDATE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferentialAction {
    /// Reject the change while referencing rows exist. This is what an
    /// unset action means.
    #[default]
    NoAction,

    /// Same as `NoAction`.
    Restrict,

    /// Delete or re-key the referencing rows along with the referenced row.
    Cascade,

    /// Clear the referencing column.
    SetNull,
}

/// Where an attribute points when foreign-key constraints are enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Table identifier of the referenced model
    pub table: String,

    /// Referenced column
    pub key: String,

    pub on_delete: Option<ReferentialAction>,

    pub on_update: Option<ReferentialAction>,
}

impl ReferentialAction {
    pub const fn as_sql(&self) -> &'static str {
        match self {
            ReferentialAction::NoAction => "NO ACTION",
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::SetNull => "SET NULL",
        }
    }

    /// Returns `true` if the action rejects changes to referenced rows.
    pub const fn is_restrictive(&self) -> bool {
        matches!(self, ReferentialAction::NoAction | ReferentialAction::Restrict)
    }
}

impl fmt::Display for ReferentialAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for ReferentialAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "NO ACTION" | "NOACTION" | "NO_ACTION" => Ok(ReferentialAction::NoAction),
            "RESTRICT" => Ok(ReferentialAction::Restrict),
            "CASCADE" => Ok(ReferentialAction::Cascade),
            "SET NULL" | "SETNULL" | "SET_NULL" => Ok(ReferentialAction::SetNull),
            _ => Err(crate::err!("unknown referential action `{s}`")),
        }
    }
}

impl Reference {
    pub fn on_delete(&self) -> ReferentialAction {
        self.on_delete.unwrap_or_default()
    }

    pub fn on_update(&self) -> ReferentialAction {
        self.on_update.unwrap_or_default()
    }
}

/// Annotates a foreign-key attribute with a reference to `target`.
///
/// Constraints are opt-in: the association must ask for them explicitly or
/// request an ON DELETE / ON UPDATE behavior. Targets without exactly one
/// primary key are left unconstrained.
pub fn annotate(
    mut attribute: Attribute,
    target: &ModelDef,
    source: &ModelDef,
    options: &BelongsToOptions,
) -> Attribute {
    let wanted =
        options.foreign_key_constraint || options.on_delete.is_some() || options.on_update.is_some();
    if !wanted {
        return attribute;
    }

    let [key] = target.primary_keys() else {
        debug!(
            "{} -> {}: no single primary key, foreign key left unconstrained",
            source.name,
            target.table()
        );
        return attribute;
    };

    attribute.references = Some(Reference {
        table: target.table().to_string(),
        key: key.clone(),
        on_delete: options.on_delete,
        on_update: options.on_update,
    });
    attribute
}
