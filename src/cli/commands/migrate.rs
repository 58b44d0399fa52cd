use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::migration::{MigrationPhase, MigrationState, prepare_store};
use crate::core::paths::{LEGACY_BACKUP, LEGACY_STORE};
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

/// Bring the store in the configured data directory up to date before any
/// command touches it. Tells the user when something actually happened.
pub fn startup(cfg: &Config) -> AppResult<MigrationState> {
    let state = prepare_store(&cfg.data_dir())?;

    match state.phase {
        MigrationPhase::Promoted => success(format!(
            "Converted {LEGACY_STORE} -> {} ({} records, legacy store kept as {LEGACY_BACKUP})",
            cfg.store_paths().destination().display(),
            state.records
        )),
        MigrationPhase::NoLegacyStore => info(format!(
            "Created new store {}",
            cfg.store_paths().destination().display()
        )),
        _ => {}
    }

    Ok(state)
}

/// Handle the `migrate` command. The conversion itself already ran in
/// [`startup`]; this only reports on it.
pub fn handle(cmd: &Commands, cfg: &Config, state: &MigrationState) -> AppResult<()> {
    if let Commands::Migrate = cmd
        && state.phase == MigrationPhase::NoOp
    {
        info(format!(
            "Store already up to date: {}",
            cfg.store_paths().destination().display()
        ));
    }
    Ok(())
}
