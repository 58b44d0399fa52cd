//! SQLite connection wrapper for the promoted destination store.

use crate::core::paths::StorePaths;
use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, OpenFlags};

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    /// Open the destination store. It must already exist: creating it is the
    /// migration's job, never a side effect of opening.
    pub fn open(paths: &StorePaths) -> AppResult<Self> {
        let path = paths.destination();
        if !path.exists() {
            return Err(AppError::Configuration(format!(
                "store not initialized: {}",
                path.display()
            )));
        }

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    /// Helper to execute a closure with a mutable connection reference.
    pub fn with_conn<F, T>(&mut self, func: F) -> AppResult<T>
    where
        F: FnOnce(&mut Connection) -> AppResult<T>,
    {
        func(&mut self.conn)
    }
}
