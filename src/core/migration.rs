//! One-time conversion of the legacy store into `tempus.sqlite`.
//!
//! Output is written to a hidden staging file next to the destination and
//! only renamed into place once every record made it across. The legacy file
//! is renamed to `.bak` and made owner-read-only after promotion. Any failure
//! before promotion deletes the staging file and leaves the legacy store
//! exactly where and as it was, so the next launch starts over.

use crate::core::paths::StorePaths;
use crate::db::migrate::migrate_records;
use crate::db::schema::create_schema;
use crate::errors::{AppError, AppResult};
use crate::legacy::{DateOrderedScan, RecordSource, TableDb};
use rusqlite::Connection;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MigrationPhase {
    #[default]
    NotStarted,
    /// Destination already present; nothing touched.
    NoOp,
    /// No legacy store; an empty destination was created.
    NoLegacyStore,
    Staging,
    /// Legacy records copied and the destination renamed into place.
    Promoted,
    Failed,
}

/// What a conversion attempt did. Lives only for the current process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MigrationState {
    pub phase: MigrationPhase,
    pub legacy_found: bool,
    pub migrated: bool,
    pub backed_up: bool,
    pub records: usize,
}

/// Convert `tempus.tdb` in `paths` using the on-disk legacy reader.
pub fn convert_legacy_store(paths: &StorePaths) -> AppResult<MigrationState> {
    convert_with(paths, open_table_db)
}

fn open_table_db(path: &Path) -> AppResult<Option<DateOrderedScan>> {
    match TableDb::open(path)? {
        Some(db) => db.scan_ordered_by_date().map(Some),
        None => Ok(None),
    }
}

/// Run the conversion with a caller-supplied legacy opener. `open_legacy`
/// receives the legacy store path and returns `None` when there is nothing
/// to convert.
pub fn convert_with<S, F>(paths: &StorePaths, open_legacy: F) -> AppResult<MigrationState>
where
    S: RecordSource,
    F: FnOnce(&Path) -> AppResult<Option<S>>,
{
    let mut state = MigrationState::default();

    if paths.destination().exists() {
        debug!(path = %paths.destination().display(), "destination store present, nothing to convert");
        state.phase = MigrationPhase::NoOp;
        return Ok(state);
    }

    remove_stale_staging(paths)?;

    state.phase = MigrationPhase::Staging;
    let staged = stage(paths, open_legacy, &mut state).and_then(|()| {
        let staging = paths.staging();
        fs::rename(&staging, paths.destination())
            .map_err(|e| AppError::filesystem("rename", &staging, e))
    });

    if let Err(e) = staged {
        state.phase = MigrationPhase::Failed;
        error!(error = %e, records = state.records, "conversion failed, discarding staging file");
        discard_staging(paths);
        return Err(e);
    }

    state.migrated = true;

    if !state.legacy_found {
        state.phase = MigrationPhase::NoLegacyStore;
        info!(path = %paths.destination().display(), "created empty store");
        return Ok(state);
    }

    state.phase = MigrationPhase::Promoted;
    info!(
        records = state.records,
        path = %paths.destination().display(),
        "legacy store converted"
    );

    backup_legacy(paths)?;
    state.backed_up = true;

    Ok(state)
}

/// Map a conversion result onto the host's startup status: 0 to carry on,
/// -1 to abort.
pub fn migration_status(result: &AppResult<MigrationState>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(_) => -1,
    }
}

/// Make sure `data_dir` exists, then bring its store up to date.
pub fn prepare_store(data_dir: &Path) -> AppResult<MigrationState> {
    fs::create_dir_all(data_dir).map_err(|e| {
        AppError::Configuration(format!(
            "cannot create data directory {}: {e}",
            data_dir.display()
        ))
    })?;

    convert_legacy_store(&StorePaths::new(data_dir))
}

/// Create the schema in the staging file and copy every legacy record into
/// it. The staging connection is closed before returning, on every path.
fn stage<S, F>(paths: &StorePaths, open_legacy: F, state: &mut MigrationState) -> AppResult<()>
where
    S: RecordSource,
    F: FnOnce(&Path) -> AppResult<Option<S>>,
{
    let staging = paths.staging();
    let mut conn = Connection::open(&staging)
        .map_err(|e| AppError::Schema(format!("cannot open {}: {e}", staging.display())))?;

    create_schema(&conn)?;

    if let Some(mut source) = open_legacy(&paths.legacy())? {
        state.legacy_found = true;
        debug!(path = %paths.legacy().display(), "copying legacy records");
        state.records = migrate_records(&mut conn, &mut source)?;
    }

    conn.close().map_err(|(_, e)| AppError::Db(e))
}

fn remove_stale_staging(paths: &StorePaths) -> AppResult<()> {
    for path in [paths.staging(), paths.staging_journal()] {
        match fs::remove_file(&path) {
            Ok(()) => warn!(path = %path.display(), "removed leftover from an interrupted conversion"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(AppError::filesystem("remove", &path, e)),
        }
    }
    Ok(())
}

fn discard_staging(paths: &StorePaths) {
    for path in [paths.staging(), paths.staging_journal()] {
        match fs::remove_file(&path) {
            Ok(()) => debug!(path = %path.display(), "removed staging file"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => error!(path = %path.display(), error = %e, "cannot remove staging file"),
        }
    }
}

/// `tempus.tdb` -> `tempus.tdb.bak`, then chmod 0400.
fn backup_legacy(paths: &StorePaths) -> AppResult<()> {
    let legacy = paths.legacy();
    let backup = paths.backup();

    fs::rename(&legacy, &backup).map_err(|e| {
        error!(path = %legacy.display(), error = %e, "cannot back up legacy store");
        AppError::filesystem("rename", &legacy, e)
    })?;

    set_owner_read_only(&backup).map_err(|e| {
        error!(path = %backup.display(), error = %e, "cannot restrict legacy backup");
        AppError::filesystem("chmod", &backup, e)
    })?;

    debug!(path = %backup.display(), "legacy store backed up");
    Ok(())
}

#[cfg(unix)]
fn set_owner_read_only(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o400))
}

#[cfg(not(unix))]
fn set_owner_read_only(path: &Path) -> io::Result<()> {
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_readonly(true);
    fs::set_permissions(path, perms)
}
