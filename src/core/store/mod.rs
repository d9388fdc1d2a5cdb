//! SQLite-backed entity store
//!
//! One parent table per entity kind plus its child tables, keyed by the
//! stripped OpenAlex ID. Writes replace an entity's full row set, child
//! collections included; reads reassemble documents through the mapper.

mod schema;

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, Transaction};

use crate::core::descriptor::{ChildShape, ChildTable};
use crate::core::entity::Entity;
use crate::core::error::{CacheError, Result};
use crate::core::id::strip_base_url;
use crate::core::kind::EntityKind;
use crate::core::mapper;

/// The entity cache backed by SQLite.
pub struct EntityStore {
    conn: Connection,
}

#[derive(Clone, Copy)]
enum WriteMode {
    /// Fail with `AlreadyExists` on a cached ID.
    Insert,
    /// Upsert-by-replace.
    Replace,
}

impl EntityStore {
    /// Open a file-backed store, creating the schema if needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        let store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Bootstrap a fresh file-backed store, wiping any prior file.
    pub fn init(path: &Path) -> Result<Self> {
        if path.exists() {
            fs::remove_file(path)?;
        }
        Self::open(path)
    }

    /// Ephemeral in-memory store.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    fn ensure_schema(&self) -> Result<()> {
        let version: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);
        if version != schema::SCHEMA_VERSION {
            schema::reset_schema(&self.conn)?;
        }
        Ok(())
    }

    /// Insert a new entity. Fails with `AlreadyExists` if the ID is cached.
    pub fn insert(&mut self, entity: &Entity) -> Result<()> {
        self.write(entity, WriteMode::Insert)
    }

    /// Insert or fully replace an entity. Child collections are cleared and
    /// re-inserted, so a shrunken collection leaves no stale rows behind.
    pub fn replace(&mut self, entity: &Entity) -> Result<()> {
        self.write(entity, WriteMode::Replace)
    }

    fn write(&mut self, entity: &Entity, mode: WriteMode) -> Result<()> {
        let desc = entity.kind().descriptor();
        let rows = mapper::normalize(entity.kind(), entity.data())?;

        let tx = self.conn.transaction()?;

        let columns: Vec<&str> = desc.parent_columns.iter().map(|c| c.name).collect();
        let verb = match mode {
            WriteMode::Insert => "INSERT",
            WriteMode::Replace => "REPLACE",
        };
        let sql = format!(
            "{} INTO {} ({}) VALUES ({})",
            verb,
            desc.parent_table,
            columns.join(", "),
            placeholders(columns.len())
        );
        tx.execute(&sql, params_from_iter(rows.parent.iter()))
            .map_err(|e| {
                if matches!(mode, WriteMode::Insert) && is_unique_violation(&e) {
                    CacheError::AlreadyExists(entity.id().to_string())
                } else {
                    CacheError::from(e)
                }
            })?;

        for (child, child_rows) in desc.children.iter().zip(&rows.children) {
            tx.execute(
                &format!("DELETE FROM {} WHERE {} = ?1", child.table, child.parent_key),
                params![rows.id],
            )?;
            insert_child_rows(&tx, child, &rows.id, child_rows)?;
        }

        tx.commit()?;
        Ok(())
    }

    /// Load entities by ID, reconstructing each document from its rows.
    ///
    /// Results come back in input order. Every requested ID must have a
    /// parent row, and every one-to-one child table must have its row; a
    /// miss is an [`CacheError::IntegrityMismatch`], never a short result.
    pub fn load_by_ids(&self, kind: EntityKind, ids: &[&str]) -> Result<Vec<Entity>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let desc = kind.descriptor();
        let stripped: Vec<String> = ids
            .iter()
            .map(|id| strip_base_url(id).to_string())
            .collect();
        let marks = placeholders(stripped.len());

        let columns: Vec<&str> = desc.parent_columns.iter().map(|c| c.name).collect();
        let sql = format!(
            "SELECT {} FROM {} WHERE id IN ({})",
            columns.join(", "),
            desc.parent_table,
            marks
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut parents: HashMap<String, Vec<SqlValue>> = HashMap::new();
        let rows = stmt.query_map(params_from_iter(stripped.iter()), |row| {
            let mut values = Vec::with_capacity(columns.len());
            for i in 0..columns.len() {
                values.push(row.get::<_, SqlValue>(i)?);
            }
            Ok(values)
        })?;
        for row in rows {
            let values = row?;
            let id = match values.first() {
                Some(SqlValue::Text(id)) => id.clone(),
                _ => {
                    return Err(CacheError::IntegrityMismatch {
                        table: desc.parent_table,
                        detail: "non-text primary key".to_string(),
                    });
                }
            };
            parents.insert(id, values);
        }

        if parents.len() != stripped.len() {
            let missing: Vec<&str> = stripped
                .iter()
                .filter(|id| !parents.contains_key(*id))
                .map(String::as_str)
                .collect();
            return Err(CacheError::IntegrityMismatch {
                table: desc.parent_table,
                detail: format!(
                    "{} of {} requested rows missing: {}",
                    missing.len(),
                    stripped.len(),
                    missing.join(", ")
                ),
            });
        }

        let mut children = Vec::with_capacity(desc.children.len());
        for child in desc.children {
            children.push(self.load_child_rows(child, &stripped, &marks)?);
        }

        let mut entities = Vec::with_capacity(stripped.len());
        for id in &stripped {
            let child_rows: Vec<Vec<Vec<SqlValue>>> = children
                .iter()
                .map(|by_id| by_id.get(id).cloned().unwrap_or_default())
                .collect();
            for (child, rows) in desc.children.iter().zip(&child_rows) {
                if matches!(child.shape, ChildShape::SingleRecord { .. }) && rows.len() != 1 {
                    return Err(CacheError::IntegrityMismatch {
                        table: child.table,
                        detail: format!("expected 1 row for {}, found {}", id, rows.len()),
                    });
                }
            }
            let doc = mapper::denormalize(kind, &parents[id], &child_rows)?;
            entities.push(Entity::new(kind, doc)?);
        }
        Ok(entities)
    }

    fn load_child_rows(
        &self,
        child: &ChildTable,
        ids: &[String],
        marks: &str,
    ) -> Result<HashMap<String, Vec<Vec<SqlValue>>>> {
        let columns: Vec<&str> = child.columns.iter().map(|c| c.name).collect();
        let order = match child.shape {
            ChildShape::RecordList => " ORDER BY seq",
            ChildShape::SingleRecord { .. } => "",
        };
        let sql = format!(
            "SELECT {}, {} FROM {} WHERE {} IN ({}){}",
            child.parent_key,
            columns.join(", "),
            child.table,
            child.parent_key,
            marks,
            order
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut grouped: HashMap<String, Vec<Vec<SqlValue>>> = HashMap::new();
        let rows = stmt.query_map(params_from_iter(ids.iter()), |row| {
            let parent: String = row.get(0)?;
            let mut values = Vec::with_capacity(columns.len());
            for i in 0..columns.len() {
                values.push(row.get::<_, SqlValue>(i + 1)?);
            }
            Ok((parent, values))
        })?;
        for row in rows {
            let (parent, values) = row?;
            grouped.entry(parent).or_default().push(values);
        }
        Ok(grouped)
    }

    /// Delete an entity and every child row owned by it.
    pub fn delete(&mut self, kind: EntityKind, id: &str) -> Result<()> {
        let desc = kind.descriptor();
        let stripped = strip_base_url(id).to_string();
        let tx = self.conn.transaction()?;
        tx.execute(
            &format!("DELETE FROM {} WHERE id = ?1", desc.parent_table),
            params![stripped],
        )?;
        for child in desc.children {
            tx.execute(
                &format!("DELETE FROM {} WHERE {} = ?1", child.table, child.parent_key),
                params![stripped],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Whether an entity is cached.
    pub fn contains(&self, kind: EntityKind, id: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM {} WHERE id = ?1",
                kind.descriptor().parent_table
            ),
            params![strip_base_url(id)],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Parent-row count for one kind.
    pub fn count(&self, kind: EntityKind) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", kind.descriptor().parent_table),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Row counts per kind, in kind order.
    pub fn stats(&self) -> Result<Vec<(EntityKind, usize)>> {
        EntityKind::all()
            .iter()
            .map(|kind| Ok((*kind, self.count(*kind)?)))
            .collect()
    }
}

fn insert_child_rows(
    tx: &Transaction<'_>,
    child: &ChildTable,
    parent_id: &str,
    rows: &[Vec<SqlValue>],
) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }
    let is_list = matches!(child.shape, ChildShape::RecordList);
    let mut columns = vec![child.parent_key];
    if is_list {
        columns.push("seq");
    }
    columns.extend(child.columns.iter().map(|c| c.name));
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        child.table,
        columns.join(", "),
        placeholders(columns.len())
    );
    let mut stmt = tx.prepare(&sql)?;
    for (seq, row) in rows.iter().enumerate() {
        let mut values = Vec::with_capacity(columns.len());
        values.push(SqlValue::Text(parent_id.to_string()));
        if is_list {
            values.push(SqlValue::Integer(seq as i64));
        }
        values.extend(row.iter().cloned());
        stmt.execute(params_from_iter(values.iter()))?;
    }
    Ok(())
}

fn placeholders(n: usize) -> String {
    (1..=n)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
