//! Destination schema and the statements shared by every writer/reader of it.

use crate::errors::{AppError, AppResult};
use rusqlite::Connection;

pub const TABLE: &str = "tempus";

pub const DB_SCHEMA: &str = "CREATE TABLE tempus (id INTEGER PRIMARY KEY, date TEXT, \
     entity TEXT, project TEXT, sub_project TEXT, duration INT, \
     description TEXT)";

pub const SQL_INSERT: &str = "INSERT INTO tempus \
     (date, entity, project, sub_project, duration, description) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

pub const SQL_UPDATE: &str = "UPDATE tempus SET \
     date = ?1, entity = ?2, project = ?3, sub_project = ?4, duration = ?5, \
     description = ?6 WHERE id = ?7";

/// Ordering the summary fold depends on: group key case-insensitively, then date.
pub const SQL_REPORT: &str = "SELECT * FROM tempus ORDER BY entity COLLATE NOCASE, \
     project COLLATE NOCASE, sub_project COLLATE NOCASE, date";

pub const SQL_BY_ID: &str = "SELECT * FROM tempus WHERE id = ?1";

pub const SQL_HISTORY: &str = "SELECT * FROM tempus ORDER BY date DESC";

/// Create the `tempus` table. Any failure is a schema error.
pub fn create_schema(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(DB_SCHEMA)
        .map_err(|e| AppError::Schema(format!("cannot create table {TABLE}: {e}")))
}
