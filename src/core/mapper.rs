//! Bidirectional translation between nested documents and flat row sets
//!
//! The write path lowers one document into a parent row plus per-child-table
//! row sets; the read path reassembles them. Both directions are driven
//! entirely by the kind descriptors, and `denormalize(normalize(doc)) == doc`
//! holds (by JSON value equality, key order aside) for every well-formed
//! per-kind document.

use rusqlite::types::Value as SqlValue;
use serde_json::{Map, Value};

use crate::core::descriptor::{ChildShape, ChildTable, Column, ColumnKind};
use crate::core::error::{CacheError, Result};
use crate::core::id::{prepend_base_url, strip_base_url};
use crate::core::kind::EntityKind;

/// A nested entity document as returned by the OpenAlex API.
pub type Document = Value;

/// Flat row form of one entity.
#[derive(Debug)]
pub struct EntityRows {
    /// Stripped primary key.
    pub id: String,
    /// Parent row values, in descriptor column order.
    pub parent: Vec<SqlValue>,
    /// Row sets per child table, in descriptor order. Rows exclude the
    /// parent key and `seq`; the store adds both when writing.
    pub children: Vec<Vec<Vec<SqlValue>>>,
}

/// Lower one document into its parent and child rows.
pub fn normalize(kind: EntityKind, doc: &Document) -> Result<EntityRows> {
    let desc = kind.descriptor();
    let obj = doc
        .as_object()
        .ok_or_else(|| malformed(kind, "document is not an object"))?;

    let id = obj
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(kind, "missing string `id` field"))?;
    let id = strip_base_url(id).to_string();

    let mut parent = Vec::with_capacity(desc.parent_columns.len());
    for column in desc.parent_columns {
        parent.push(lower_value(kind, column, lookup_path(doc, column.path))?);
    }

    let mut children = Vec::with_capacity(desc.children.len());
    for child in desc.children {
        children.push(lower_child(kind, child, obj.get(child.field))?);
    }

    Ok(EntityRows { id, parent, children })
}

/// Reassemble one document from its parent row and child row sets.
pub fn denormalize(
    kind: EntityKind,
    parent: &[SqlValue],
    children: &[Vec<Vec<SqlValue>>],
) -> Result<Document> {
    let desc = kind.descriptor();
    let mut doc = Map::new();

    for (column, value) in desc.parent_columns.iter().zip(parent) {
        let raised = raise_value(kind, desc.parent_table, column, value)?;
        insert_path(&mut doc, column.path, raised);
    }

    for (child, rows) in desc.children.iter().zip(children) {
        match child.shape {
            ChildShape::RecordList => {
                let mut items = Vec::with_capacity(rows.len());
                for row in rows {
                    items.push(Value::Object(raise_record(kind, child, row, false)?));
                }
                doc.insert(child.field.to_string(), Value::Array(items));
            }
            ChildShape::SingleRecord { omit_null_fields } => {
                let row = rows.first().ok_or_else(|| CacheError::IntegrityMismatch {
                    table: child.table,
                    detail: "expected exactly one row per parent, found none".to_string(),
                })?;
                let record = raise_record(kind, child, row, omit_null_fields)?;
                doc.insert(child.field.to_string(), Value::Object(record));
            }
        }
    }

    Ok(Value::Object(doc))
}

fn lower_child(
    kind: EntityKind,
    child: &ChildTable,
    field: Option<&Value>,
) -> Result<Vec<Vec<SqlValue>>> {
    match child.shape {
        ChildShape::RecordList => {
            let items = match field {
                None | Some(Value::Null) => return Ok(Vec::new()),
                Some(Value::Array(items)) => items,
                Some(_) => {
                    return Err(malformed(kind, format!("`{}` is not a list", child.field)));
                }
            };
            items
                .iter()
                .map(|item| lower_row(kind, child, item))
                .collect()
        }
        ChildShape::SingleRecord { .. } => {
            let record = match field {
                Some(record @ Value::Object(_)) => record,
                _ => {
                    return Err(malformed(
                        kind,
                        format!("missing `{}` sub-record", child.field),
                    ));
                }
            };
            Ok(vec![lower_row(kind, child, record)?])
        }
    }
}

fn lower_row(kind: EntityKind, child: &ChildTable, record: &Value) -> Result<Vec<SqlValue>> {
    if !record.is_object() {
        return Err(malformed(
            kind,
            format!("`{}` element is not an object", child.field),
        ));
    }
    child
        .columns
        .iter()
        .map(|column| lower_value(kind, column, lookup_path(record, column.path)))
        .collect()
}

fn lower_value(kind: EntityKind, column: &Column, value: Option<&Value>) -> Result<SqlValue> {
    let value = match value {
        None | Some(Value::Null) => return Ok(SqlValue::Null),
        Some(value) => value,
    };
    match column.kind {
        ColumnKind::Text => match value {
            Value::String(s) => Ok(SqlValue::Text(s.clone())),
            other => Err(type_mismatch(kind, column, "string", other)),
        },
        ColumnKind::Integer => value
            .as_i64()
            .map(SqlValue::Integer)
            .ok_or_else(|| type_mismatch(kind, column, "integer", value)),
        ColumnKind::Real => value
            .as_f64()
            .map(SqlValue::Real)
            .ok_or_else(|| type_mismatch(kind, column, "number", value)),
        ColumnKind::Json => Ok(SqlValue::Text(value.to_string())),
        ColumnKind::EntityId => match value {
            Value::String(s) => Ok(SqlValue::Text(strip_base_url(s).to_string())),
            other => Err(type_mismatch(kind, column, "identifier string", other)),
        },
    }
}

fn raise_record(
    kind: EntityKind,
    child: &ChildTable,
    row: &[SqlValue],
    omit_null_fields: bool,
) -> Result<Map<String, Value>> {
    let mut record = Map::new();
    for (column, value) in child.columns.iter().zip(row) {
        let raised = raise_value(kind, child.table, column, value)?;
        if omit_null_fields && raised.is_null() {
            continue;
        }
        insert_path(&mut record, column.path, raised);
    }
    Ok(record)
}

fn raise_value(
    kind: EntityKind,
    table: &'static str,
    column: &Column,
    value: &SqlValue,
) -> Result<Value> {
    match (column.kind, value) {
        (_, SqlValue::Null) => Ok(Value::Null),
        (ColumnKind::Text, SqlValue::Text(s)) => Ok(Value::String(s.clone())),
        (ColumnKind::Integer, SqlValue::Integer(i)) => Ok(Value::from(*i)),
        (ColumnKind::Real, SqlValue::Real(f)) => Ok(serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null)),
        (ColumnKind::Real, SqlValue::Integer(i)) => Ok(Value::from(*i)),
        (ColumnKind::Json, SqlValue::Text(s)) => {
            serde_json::from_str(s).map_err(|e| CacheError::Malformed {
                context: format!("{kind} column {}.{}", table, column.name),
                detail: e.to_string(),
            })
        }
        (ColumnKind::EntityId, SqlValue::Text(s)) => Ok(Value::String(prepend_base_url(s))),
        (_, other) => Err(CacheError::Malformed {
            context: format!("{kind} column {}.{}", table, column.name),
            detail: format!("unexpected storage value {other:?}"),
        }),
    }
}

fn lookup_path<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for segment in path {
        current = current.get(segment)?;
    }
    Some(current)
}

fn insert_path(map: &mut Map<String, Value>, path: &[&str], value: Value) {
    match path {
        [] => {}
        [leaf] => {
            map.insert((*leaf).to_string(), value);
        }
        [head, rest @ ..] => {
            let entry = map
                .entry((*head).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(inner) = entry {
                insert_path(inner, rest, value);
            }
        }
    }
}

fn malformed(kind: EntityKind, detail: impl Into<String>) -> CacheError {
    CacheError::Malformed {
        context: format!("{kind} document"),
        detail: detail.into(),
    }
}

fn type_mismatch(kind: EntityKind, column: &Column, expected: &str, found: &Value) -> CacheError {
    CacheError::Malformed {
        context: format!("{kind} field {}", column.path.join(".")),
        detail: format!("expected {expected}, found {found}"),
    }
}
