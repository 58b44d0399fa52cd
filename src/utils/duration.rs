//! Duration utilities: `HH:MM:SS` text <-> whole seconds.

use crate::errors::{AppError, AppResult};

/// Field layout used when rendering a duration.
///
/// Minutes and seconds are always two zero-padded digits; only the width of
/// the hours field varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationFormat {
    pub hours_width: usize,
}

impl DurationFormat {
    /// `%02d:%02d:%02d`, the layout stored by the legacy store.
    pub const PADDED: Self = Self { hours_width: 2 };
    /// `%u:%02u:%02u`, used by the summary report.
    pub const COMPACT: Self = Self { hours_width: 1 };
}

impl Default for DurationFormat {
    fn default() -> Self {
        Self::PADDED
    }
}

/// Parse `HH:MM:SS` into seconds.
///
/// The hours field may be any non-empty run of digits; minutes and seconds
/// must be exactly two digits below 60.
pub fn parse_duration(text: &str) -> AppResult<i64> {
    let invalid = || AppError::InvalidDuration(text.to_string());

    let mut fields = text.split(':');
    let (Some(h), Some(m), Some(s), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(invalid());
    };

    let hours = digits(h, None).ok_or_else(invalid)?;
    let minutes = digits(m, Some(2)).filter(|v| *v < 60).ok_or_else(invalid)?;
    let seconds = digits(s, Some(2)).filter(|v| *v < 60).ok_or_else(invalid)?;

    hours
        .checked_mul(3600)
        .and_then(|v| v.checked_add(minutes * 60 + seconds))
        .ok_or_else(invalid)
}

fn digits(field: &str, width: Option<usize>) -> Option<i64> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if width.is_some_and(|w| field.len() != w) {
        return None;
    }
    field.parse().ok()
}

/// Render seconds as `H:MM:SS` with the requested hours width.
/// Negative input renders as zero.
pub fn format_duration(seconds: i64, fmt: DurationFormat) -> String {
    let total = seconds.max(0);
    let hours = total / 3600;
    let minutes = (total / 60) % 60;
    let secs = total % 60;

    format!(
        "{:0width$}:{:02}:{:02}",
        hours,
        minutes,
        secs,
        width = fmt.hours_width
    )
}
