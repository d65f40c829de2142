use super::{Record, Value};
use indexmap::IndexMap;

/// A conjunction of `column = value` conditions.
///
/// A condition against `NULL` never matches, as in SQL.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Filter {
    conditions: IndexMap<String, Value>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new().and(column, value)
    }

    pub fn and(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.insert(column.into(), value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.conditions.get(column)
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.conditions
            .iter()
            .map(|(column, value)| (column.as_str(), value))
    }

    /// Adds the conditions of `overlay`; on a shared column the overlay's
    /// value replaces the existing one.
    pub fn extend(&mut self, overlay: Filter) {
        self.conditions.extend(overlay.conditions);
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.conditions.iter().all(|(column, expected)| {
            !expected.is_null() && record.get(column) == Some(expected)
        })
    }
}
