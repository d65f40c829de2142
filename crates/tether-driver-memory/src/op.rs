use crate::table::Tables;

use log::debug;
use tether_core::{
    driver::{
        operation::{DeleteByKey, FindMany, Insert, UpdateByKey},
        Operation, Response,
    },
    err,
    schema::{Model, Reference, ReferentialAction},
    stmt::{Record, Value},
    Error, Result, Schema,
};

/// Applies a data-modifying operation to `tables`.
pub(crate) fn write(schema: &Schema, tables: &mut Tables, op: Operation) -> Result<Response> {
    match op {
        Operation::Insert(op) => insert(schema, tables, op),
        Operation::UpdateByKey(op) => update_by_key(schema, tables, op),
        Operation::DeleteByKey(op) => delete_by_key(schema, tables, op),
        op => Err(err!("not a write operation: {op:?}")),
    }
}

pub(crate) fn insert(schema: &Schema, tables: &mut Tables, op: Insert) -> Result<Response> {
    let model = schema.model(op.model);
    let table = tables.table_mut(model)?;

    let mut record = Record::new();

    for (name, attribute) in &model.attributes {
        let value = match op.values.get(name) {
            Some(value) if !value.is_null() => value.clone(),
            _ if attribute.auto_increment && attribute.ty.is_integer() => {
                Value::I64(table.next_id())
            }
            _ => Value::Null,
        };

        if attribute.auto_increment {
            if let Some(id) = value.as_i64() {
                table.last_id = table.last_id.max(id);
            }
        }

        record.insert(name.clone(), value);
    }

    if model.has_primary_keys() && table.rows.iter().any(|row| same_key(model, row, &record)) {
        return Err(duplicate_key(model, &record));
    }

    check_references(
        tables,
        model,
        &record,
        model.attributes.keys().map(String::as_str),
    )?;

    tables.table_mut(model)?.rows.push(record.clone());

    Ok(Response::values(vec![record]))
}

pub(crate) fn find_many(schema: &Schema, tables: &Tables, op: FindMany) -> Result<Response> {
    let model = schema.model(op.model);
    let table = tables.table(model)?;

    let rows: Vec<_> = table
        .rows
        .iter()
        .filter(|row| op.filter.matches(row))
        .take(op.limit.unwrap_or(usize::MAX))
        .cloned()
        .collect();

    Ok(Response::values(rows))
}

pub(crate) fn update_by_key(
    schema: &Schema,
    tables: &mut Tables,
    op: UpdateByKey,
) -> Result<Response> {
    let model = schema.model(op.model);
    let table = tables.table(model)?;

    let Some(index) = table.position(&op.key) else {
        return Ok(Response::count(0));
    };

    let previous = table.rows[index].clone();
    let mut updated = previous.clone();

    for (name, value) in op.assignments.iter() {
        if model.attributes.contains_key(name) {
            updated.insert(name, value.clone());
        }
    }

    if model.has_primary_keys()
        && !same_key(model, &previous, &updated)
        && table.rows.iter().any(|row| same_key(model, row, &updated))
    {
        return Err(duplicate_key(model, &updated));
    }

    check_references(tables, model, &updated, op.assignments.names())?;

    tables.table_mut(model)?.rows[index] = updated.clone();

    propagate_update(schema, tables, model, &previous, &updated)?;

    Ok(Response::count(1))
}

pub(crate) fn delete_by_key(
    schema: &Schema,
    tables: &mut Tables,
    op: DeleteByKey,
) -> Result<Response> {
    let model = schema.model(op.model);

    let count = remove_where(schema, tables, model, &op.key)?;
    Ok(Response::count(count))
}

/// Removes the rows of `model` matching `key`, then applies the ON DELETE
/// action of every reference to them.
fn remove_where(schema: &Schema, tables: &mut Tables, model: &Model, key: &Record) -> Result<u64> {
    let removed = tables.table_mut(model)?.take_matching(key);

    for row in &removed {
        for (source, fk, reference) in referencing(schema, model) {
            let Some(key) = row.get(&reference.key).filter(|key| !key.is_null()) else {
                continue;
            };

            match reference.on_delete() {
                ReferentialAction::Cascade => {
                    let dependents = Record::from([(fk, key.clone())]);
                    let count = remove_where(schema, tables, source, &dependents)?;
                    debug!("cascade delete: {count} row(s) from {}", source.table);
                }
                ReferentialAction::SetNull => {
                    tables.table_mut(source)?.replace(fk, key, &Value::Null);
                }
                action if action.is_restrictive() => {
                    if tables.table(source)?.contains(fk, key) {
                        return Err(restricted(source, fk, model, action, "delete"));
                    }
                }
                _ => {}
            }
        }
    }

    Ok(removed.len() as u64)
}

/// Applies the ON UPDATE action of every reference to a row whose
/// referenced columns changed.
fn propagate_update(
    schema: &Schema,
    tables: &mut Tables,
    model: &Model,
    previous: &Record,
    updated: &Record,
) -> Result<()> {
    for (source, fk, reference) in referencing(schema, model) {
        let Some(old) = previous.get(&reference.key).filter(|old| !old.is_null()) else {
            continue;
        };
        let new = updated.get(&reference.key).cloned().unwrap_or_default();

        if *old == new || !tables.table(source)?.contains(fk, old) {
            continue;
        }

        match reference.on_update() {
            ReferentialAction::Cascade => {
                tables.table_mut(source)?.replace(fk, old, &new);
            }
            ReferentialAction::SetNull => {
                tables.table_mut(source)?.replace(fk, old, &Value::Null);
            }
            action if action.is_restrictive() => {
                return Err(restricted(source, fk, model, action, "update"))
            }
            _ => {}
        }
    }

    Ok(())
}

/// Every non-null value written to a constrained column must reference an
/// existing row.
fn check_references<'a>(
    tables: &Tables,
    model: &Model,
    record: &Record,
    columns: impl IntoIterator<Item = &'a str>,
) -> Result<()> {
    for column in columns {
        let Some(reference) = model
            .attribute(column)
            .and_then(|attribute| attribute.references.as_ref())
        else {
            continue;
        };

        let Some(value) = record.get(column).filter(|value| !value.is_null()) else {
            continue;
        };

        let exists = tables
            .get(&reference.table)
            .is_some_and(|table| table.contains(&reference.key, value));

        if !exists {
            return Err(Error::constraint_violation(format!(
                "{}.{} = {} references a missing {}.{}",
                model.table, column, value, reference.table, reference.key
            )));
        }
    }

    Ok(())
}

/// Constrained columns, on any model, that reference `target`.
fn referencing<'a>(
    schema: &'a Schema,
    target: &Model,
) -> Vec<(&'a Model, &'a str, &'a Reference)> {
    schema
        .models()
        .flat_map(|model| {
            model.attributes.iter().filter_map(move |(name, attribute)| {
                let reference = attribute.references.as_ref()?;
                Some((model, name.as_str(), reference))
            })
        })
        .filter(|(_, _, reference)| reference.table == target.table)
        .collect()
}

fn same_key(model: &Model, a: &Record, b: &Record) -> bool {
    model
        .primary_key
        .iter()
        .all(|column| a.get(column) == b.get(column))
}

fn duplicate_key(model: &Model, record: &Record) -> Error {
    let key = record.project(model.primary_key.iter().map(String::as_str));
    Error::constraint_violation(format!("duplicate key in {}: {:?}", model.table, key))
}

fn restricted(
    source: &Model,
    column: &str,
    target: &Model,
    action: ReferentialAction,
    verb: &str,
) -> Error {
    Error::constraint_violation(format!(
        "{}.{} references {} (ON {} {})",
        source.table,
        column,
        target.table,
        verb.to_uppercase(),
        action
    ))
}
