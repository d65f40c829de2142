use indexmap::IndexMap;
use tether_core::{
    err,
    schema::Model,
    stmt::{Record, Value},
    Result,
};

/// Every table of the store, keyed by table identifier.
#[derive(Debug, Default, Clone)]
pub(crate) struct Tables {
    tables: IndexMap<String, Table>,
}

#[derive(Debug, Default, Clone)]
pub(crate) struct Table {
    /// Rows in insertion order
    pub(crate) rows: Vec<Record>,

    /// Last value handed out for auto-increment columns
    pub(crate) last_id: i64,
}

impl Tables {
    pub(crate) fn create(&mut self, name: &str) {
        self.tables.insert(name.to_string(), Table::default());
    }

    pub(crate) fn table(&self, model: &Model) -> Result<&Table> {
        self.tables
            .get(&model.table)
            .ok_or_else(|| err!("table `{}` does not exist", model.table))
    }

    pub(crate) fn table_mut(&mut self, model: &Model) -> Result<&mut Table> {
        self.tables
            .get_mut(&model.table)
            .ok_or_else(|| err!("table `{}` does not exist", model.table))
    }

    pub(crate) fn get(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }
}

impl Table {
    /// Index of the first row holding every value of `key`.
    pub(crate) fn position(&self, key: &Record) -> Option<usize> {
        self.rows.iter().position(|row| matches_key(row, key))
    }

    /// Whether some row's `column` equals `value`. `NULL` matches nothing.
    pub(crate) fn contains(&self, column: &str, value: &Value) -> bool {
        !value.is_null() && self.rows.iter().any(|row| row.get(column) == Some(value))
    }

    /// Sets `column` to `to` on every row where it currently equals `from`.
    pub(crate) fn replace(&mut self, column: &str, from: &Value, to: &Value) -> usize {
        let mut count = 0;

        for row in &mut self.rows {
            if row.get(column) == Some(from) {
                row.insert(column, to.clone());
                count += 1;
            }
        }

        count
    }

    /// Removes and returns every row holding every value of `key`.
    pub(crate) fn take_matching(&mut self, key: &Record) -> Vec<Record> {
        let (taken, kept) = std::mem::take(&mut self.rows)
            .into_iter()
            .partition(|row| matches_key(row, key));

        self.rows = kept;
        taken
    }

    pub(crate) fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

/// An empty key, or one with a `NULL` component, matches nothing.
fn matches_key(row: &Record, key: &Record) -> bool {
    !key.is_empty()
        && key
            .iter()
            .all(|(column, value)| !value.is_null() && row.get(column) == Some(value))
}
