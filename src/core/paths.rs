//! File layout of the data directory.

use std::path::PathBuf;

pub const LEGACY_STORE: &str = "tempus.tdb";
pub const DESTINATION_STORE: &str = "tempus.sqlite";
pub const STAGING_STORE: &str = ".tempus.sqlite";
pub const LEGACY_BACKUP: &str = "tempus.tdb.bak";

/// Every store file lives in one directory; this names them all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    dir: PathBuf,
}

impl StorePaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn legacy(&self) -> PathBuf {
        self.dir.join(LEGACY_STORE)
    }

    pub fn destination(&self) -> PathBuf {
        self.dir.join(DESTINATION_STORE)
    }

    /// Hidden sibling of the destination; conversion output is only ever
    /// written here and renamed into place.
    pub fn staging(&self) -> PathBuf {
        self.dir.join(STAGING_STORE)
    }

    /// SQLite's rollback journal for the staging file.
    pub fn staging_journal(&self) -> PathBuf {
        self.dir.join(format!("{STAGING_STORE}-journal"))
    }

    pub fn backup(&self) -> PathBuf {
        self.dir.join(LEGACY_BACKUP)
    }
}
