// src/db/maintenance.rs
//
// Whole-database utilities used by the data service and the CLI.

use rusqlite::Connection;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::SyncTable;
use crate::error::AppResult;

/// One column as reported by `PRAGMA table_info`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnInfo {
    pub cid: i64,
    pub name: String,
    pub data_type: String,
    pub not_null: bool,
    pub default_value: Option<String>,
    pub primary_key: bool,
}

/// Column layout of every application table, keyed by table name
pub fn table_info(conn: &Connection) -> AppResult<BTreeMap<String, Vec<ColumnInfo>>> {
    let mut info = BTreeMap::new();

    for table in SyncTable::ALL {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table.table_name()))?;
        let columns = stmt
            .query_map([], |row| {
                Ok(ColumnInfo {
                    cid: row.get("cid")?,
                    name: row.get("name")?,
                    data_type: row.get("type")?,
                    not_null: row.get::<_, i64>("notnull")? != 0,
                    default_value: row.get("dflt_value")?,
                    primary_key: row.get::<_, i64>("pk")? != 0,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        info.insert(table.table_name().to_string(), columns);
    }

    Ok(info)
}

/// Delete every row of the application tables
///
/// Children go first so the statement order holds even with foreign keys
/// enforced and without relying on cascades. Runs in one transaction.
pub fn clear_all_data(conn: &mut Connection) -> AppResult<()> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM horarios", [])?;
    tx.execute("DELETE FROM notas", [])?;
    tx.execute("DELETE FROM materias", [])?;
    tx.execute("DELETE FROM usuarios", [])?;
    tx.commit()?;

    log::warn!("All application data cleared");
    Ok(())
}
