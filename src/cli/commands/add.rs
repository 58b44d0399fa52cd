use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::entries::{insert_entry, load_entry, update_entry};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::TimeEntry;
use crate::ui::messages::success;
use crate::utils::date::{self, DATE_FORMAT, logical_today, parse_iso_date};
use crate::utils::duration::parse_duration;

/// Handle the `add` command: insert a new entry, or overwrite `--id`.
/// Only entries dated on the current working day may be overwritten.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Add {
        entity,
        project,
        sub_project,
        duration,
        description,
        date: entry_date,
        id,
    } = cmd
    {
        let today = logical_today(date::now(), cfg.day_start_offset()?);
        let day = match entry_date {
            Some(d) => parse_iso_date(d)?,
            None => today,
        };

        let entry = TimeEntry::new(
            day.format(DATE_FORMAT).to_string(),
            entity.as_str(),
            project.as_str(),
            sub_project.as_str(),
            parse_duration(duration)?,
        )
        .with_description(description.as_str());

        let mut pool = DbPool::open(&cfg.store_paths())?;
        let saved = pool.with_conn(|conn| match id {
            Some(id) => {
                let existing = load_entry(conn, *id)?;
                if existing.date != today.format(DATE_FORMAT).to_string() {
                    return Err(AppError::EntryLocked {
                        id: *id,
                        date: existing.date,
                    });
                }
                update_entry(conn, *id, &entry).map(|()| *id)
            }
            None => insert_entry(conn, &entry),
        })?;

        success(format!(
            "Saved entry #{saved}: {} {} / {} / {} {}",
            entry.date, entry.entity, entry.project, entry.sub_project, duration
        ));
    }
    Ok(())
}
