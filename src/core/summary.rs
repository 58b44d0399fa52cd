//! Fold report-ordered entries into one row per (entity, project, sub-project) run.

use crate::db::entries::load_report_rows;
use crate::errors::AppResult;
use crate::models::{SummaryRow, TimeEntry};
use rusqlite::Connection;
use std::iter::{Fuse, FusedIterator};

/// Lazy summary fold over entries sorted by group key, then date.
///
/// No sorting happens here. A group closes as soon as an entry with a
/// different key (ASCII case-insensitive) shows up, so unsorted input yields
/// one row per run rather than one per key. The period is the first and last
/// date seen in the run.
pub struct Summaries<I> {
    entries: Fuse<I>,
    pending: Option<SummaryRow>,
}

pub fn summarize<I>(entries: I) -> Summaries<I::IntoIter>
where
    I: IntoIterator<Item = TimeEntry>,
{
    Summaries {
        entries: entries.into_iter().fuse(),
        pending: None,
    }
}

impl<I> Iterator for Summaries<I>
where
    I: Iterator<Item = TimeEntry>,
{
    type Item = SummaryRow;

    fn next(&mut self) -> Option<SummaryRow> {
        for entry in self.entries.by_ref() {
            match self.pending.as_mut() {
                Some(group) if group.accepts(&entry) => group.extend(entry),
                _ => {
                    let flushed = self.pending.replace(SummaryRow::seed(entry));
                    if flushed.is_some() {
                        return flushed;
                    }
                }
            }
        }

        // input exhausted: the last group is flushed even if it is the only one
        self.pending.take()
    }
}

impl<I> FusedIterator for Summaries<I> where I: Iterator<Item = TimeEntry> {}

/// Run the report query and fold it.
pub fn load_summaries(conn: &Connection) -> AppResult<Vec<SummaryRow>> {
    Ok(summarize(load_report_rows(conn)?).collect())
}
