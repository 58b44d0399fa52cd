pub mod legacy_record;
pub mod summary_row;
pub mod time_entry;

pub use legacy_record::LegacyRecord;
pub use summary_row::SummaryRow;
pub use time_entry::TimeEntry;
