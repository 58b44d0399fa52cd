use crate::errors::{AppError, AppResult};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Accept only zero-padded `YYYY-MM-DD` naming a real calendar day.
pub fn parse_iso_date(s: &str) -> AppResult<NaiveDate> {
    let d = NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|_| AppError::InvalidDate(s.to_string()))?;

    // chrono tolerates missing zero padding; stored dates must sort lexically
    if d.format(DATE_FORMAT).to_string() != s {
        return Err(AppError::InvalidDate(s.to_string()));
    }
    Ok(d)
}

/// Parse a `HH:MM` day-start offset into seconds past midnight.
pub fn parse_day_start(s: &str) -> AppResult<i64> {
    let t = NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|_| AppError::InvalidTime(s.to_string()))?;
    Ok(i64::from(t.num_seconds_from_midnight()))
}

/// The working day `now` belongs to, given a day that starts `offset_secs`
/// after midnight.
pub fn logical_today(now: NaiveDateTime, offset_secs: i64) -> NaiveDate {
    (now - Duration::seconds(offset_secs)).date()
}

/// First date still inside a history window of `days` days ending at `now`.
/// The window counts calendar days; the day-start offset does not apply.
pub fn history_start(now: NaiveDateTime, days: i64) -> NaiveDate {
    now.date() - Duration::days(days.max(0))
}
