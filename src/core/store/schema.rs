//! Store schema bootstrap
//!
//! The DDL is generated from the kind descriptors so the schema and the
//! mapper can never drift apart. Referential integrity is by convention
//! (no enforced foreign keys, no ON DELETE CASCADE); deletes are explicit
//! per table.

use rusqlite::{params, Connection};

use crate::core::descriptor::{ChildShape, ChildTable, ColumnKind, KindDescriptor};
use crate::core::error::Result;
use crate::core::kind::EntityKind;

/// Current schema version - the store is wiped and rebuilt on mismatch.
pub(super) const SCHEMA_VERSION: i32 = 1;

pub(super) fn init_schema(conn: &Connection) -> Result<()> {
    let mut ddl = String::from(
        "CREATE TABLE IF NOT EXISTS schema_version (\n    version INTEGER PRIMARY KEY\n);\n",
    );
    for kind in EntityKind::all() {
        push_kind_ddl(&mut ddl, kind.descriptor());
    }
    conn.execute_batch(&ddl)?;

    conn.execute(
        "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
        params![SCHEMA_VERSION],
    )?;
    Ok(())
}

/// Drop every table and reinitialize with the current schema.
pub(super) fn reset_schema(conn: &Connection) -> Result<()> {
    let mut ddl = String::from("DROP TABLE IF EXISTS schema_version;\n");
    for kind in EntityKind::all() {
        let desc = kind.descriptor();
        ddl.push_str(&format!("DROP TABLE IF EXISTS {};\n", desc.parent_table));
        for child in desc.children {
            ddl.push_str(&format!("DROP TABLE IF EXISTS {};\n", child.table));
        }
    }
    conn.execute_batch(&ddl)?;
    init_schema(conn)
}

fn push_kind_ddl(ddl: &mut String, desc: &KindDescriptor) {
    ddl.push_str(&format!("CREATE TABLE IF NOT EXISTS {} (\n", desc.parent_table));
    for (i, column) in desc.parent_columns.iter().enumerate() {
        let key = if i == 0 { " PRIMARY KEY" } else { "" };
        let comma = if i + 1 == desc.parent_columns.len() { "" } else { "," };
        ddl.push_str(&format!(
            "    {} {}{}{}\n",
            column.name,
            sql_type(column.kind),
            key,
            comma
        ));
    }
    ddl.push_str(");\n");

    for child in desc.children {
        push_child_ddl(ddl, child);
    }
}

fn push_child_ddl(ddl: &mut String, child: &ChildTable) {
    ddl.push_str(&format!("CREATE TABLE IF NOT EXISTS {} (\n", child.table));
    match child.shape {
        ChildShape::RecordList => {
            ddl.push_str(&format!("    {} TEXT NOT NULL,\n", child.parent_key));
            ddl.push_str("    seq INTEGER NOT NULL,\n");
            for column in child.columns {
                ddl.push_str(&format!("    {} {},\n", column.name, sql_type(column.kind)));
            }
            ddl.push_str(&format!("    PRIMARY KEY ({}, seq)\n", child.parent_key));
        }
        ChildShape::SingleRecord { .. } => {
            ddl.push_str(&format!("    {} TEXT PRIMARY KEY", child.parent_key));
            for column in child.columns {
                ddl.push_str(&format!(",\n    {} {}", column.name, sql_type(column.kind)));
            }
            ddl.push('\n');
        }
    }
    ddl.push_str(");\n");
}

fn sql_type(kind: ColumnKind) -> &'static str {
    match kind {
        ColumnKind::Text | ColumnKind::Json | ColumnKind::EntityId => "TEXT",
        ColumnKind::Integer => "INTEGER",
        ColumnKind::Real => "REAL",
    }
}
