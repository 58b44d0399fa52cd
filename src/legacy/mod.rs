//! Read side of the pre-SQLite store.
//!
//! Consumers only see [`RecordSource`]: one record at a time, in date order,
//! until the source runs dry.

pub mod tdb;

use crate::errors::AppResult;
use crate::models::LegacyRecord;
use std::collections::VecDeque;

pub use tdb::{DateOrderedScan, TableDb};

pub trait RecordSource {
    /// Next record, or `None` once the source is exhausted.
    fn next_record(&mut self) -> AppResult<Option<LegacyRecord>>;
}

/// In-memory source, handy for feeding the migrator without a legacy file.
#[derive(Debug, Default)]
pub struct MemorySource {
    records: VecDeque<LegacyRecord>,
}

impl MemorySource {
    /// Records are sorted by date the same way the on-disk scan orders them.
    pub fn new(mut records: Vec<LegacyRecord>) -> Self {
        records.sort_by(|a, b| a.date.as_bytes().cmp(b.date.as_bytes()));
        Self {
            records: records.into(),
        }
    }
}

impl RecordSource for MemorySource {
    fn next_record(&mut self) -> AppResult<Option<LegacyRecord>> {
        Ok(self.records.pop_front())
    }
}
