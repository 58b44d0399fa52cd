use crate::db::schema::{SQL_BY_ID, SQL_HISTORY, SQL_INSERT, SQL_REPORT, SQL_UPDATE};
use crate::errors::{AppError, AppResult};
use crate::models::TimeEntry;
use crate::utils::date::DATE_FORMAT;
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

pub fn map_row(row: &Row) -> Result<TimeEntry> {
    Ok(TimeEntry {
        id: row.get("id")?,
        date: row.get::<_, Option<String>>("date")?.unwrap_or_default(),
        entity: row.get::<_, Option<String>>("entity")?.unwrap_or_default(),
        project: row.get::<_, Option<String>>("project")?.unwrap_or_default(),
        sub_project: row
            .get::<_, Option<String>>("sub_project")?
            .unwrap_or_default(),
        duration: row.get::<_, Option<i64>>("duration")?.unwrap_or(0),
        description: row
            .get::<_, Option<String>>("description")?
            .unwrap_or_default(),
    })
}

/// Insert a new entry and return its id.
pub fn insert_entry(conn: &Connection, entry: &TimeEntry) -> AppResult<i64> {
    let mut stmt = conn.prepare_cached(SQL_INSERT)?;
    stmt.execute(params![
        entry.date,
        entry.entity,
        entry.project,
        entry.sub_project,
        entry.duration,
        entry.description,
    ])?;
    Ok(conn.last_insert_rowid())
}

pub fn load_entry(conn: &Connection, id: i64) -> AppResult<TimeEntry> {
    conn.query_row(SQL_BY_ID, [id], map_row)
        .optional()?
        .ok_or(AppError::EntryNotFound(id))
}

/// Overwrite every column of entry `id`.
pub fn update_entry(conn: &Connection, id: i64, entry: &TimeEntry) -> AppResult<()> {
    let mut stmt = conn.prepare_cached(SQL_UPDATE)?;
    let changed = stmt.execute(params![
        entry.date,
        entry.entity,
        entry.project,
        entry.sub_project,
        entry.duration,
        entry.description,
        id,
    ])?;

    if changed == 0 {
        return Err(AppError::EntryNotFound(id));
    }
    Ok(())
}

/// Entries newest first. With `since`, stops at the first entry dated before it.
pub fn load_entries(conn: &Connection, since: Option<NaiveDate>) -> AppResult<Vec<TimeEntry>> {
    let cutoff = since.map(|d| d.format(DATE_FORMAT).to_string());

    let mut stmt = conn.prepare(SQL_HISTORY)?;
    let mut rows = stmt.query([])?;

    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let entry = map_row(row)?;
        if cutoff.as_deref().is_some_and(|c| entry.date.as_str() < c) {
            break;
        }
        out.push(entry);
    }
    Ok(out)
}

/// Every entry in report order, ready for the summary fold.
pub fn load_report_rows(conn: &Connection) -> AppResult<Vec<TimeEntry>> {
    let mut stmt = conn.prepare(SQL_REPORT)?;
    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
