//! Legacy record -> `tempus` row conversion.

use crate::db::schema::SQL_INSERT;
use crate::errors::{AppError, AppResult};
use crate::legacy::RecordSource;
use crate::models::{LegacyRecord, TimeEntry};
use crate::utils::date::parse_iso_date;
use crate::utils::duration::parse_duration;
use rusqlite::{Connection, params};
use tracing::trace;

/// Map one legacy record onto a destination row: `company` becomes `entity`
/// and `hours` becomes seconds. Everything else is copied verbatim.
pub fn to_time_entry(rec: &LegacyRecord) -> AppResult<TimeEntry> {
    parse_iso_date(&rec.date).map_err(|e| transform_error(rec, e))?;
    let duration = parse_duration(&rec.hours).map_err(|e| transform_error(rec, e))?;

    Ok(TimeEntry {
        id: None,
        date: rec.date.clone(),
        entity: rec.company.clone(),
        project: rec.project.clone(),
        sub_project: rec.sub_project.clone(),
        duration,
        description: rec.description.clone(),
    })
}

/// Insert every record `source` yields, in order, through one prepared
/// statement inside one transaction. Returns the number of rows written.
///
/// The first bad record aborts the whole run and rolls back; the caller owns
/// discarding the file.
pub fn migrate_records<S>(conn: &mut Connection, source: &mut S) -> AppResult<usize>
where
    S: RecordSource + ?Sized,
{
    let tx = conn.transaction()?;
    let mut copied = 0usize;

    {
        let mut stmt = tx.prepare(SQL_INSERT)?;

        while let Some(rec) = source.next_record()? {
            let entry = to_time_entry(&rec)?;

            stmt.execute(params![
                entry.date,
                entry.entity,
                entry.project,
                entry.sub_project,
                entry.duration,
                entry.description,
            ])
            .map_err(|e| transform_error(&rec, e))?;

            trace!(key = %rec.key, date = %rec.date, "copied legacy record");
            copied += 1;
        }
    }

    tx.commit()?;
    Ok(copied)
}

fn transform_error(rec: &LegacyRecord, reason: impl std::fmt::Display) -> AppError {
    AppError::Transform {
        record: rec.key.clone(),
        reason: reason.to_string(),
    }
}
