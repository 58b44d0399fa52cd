use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::entries::load_entries;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::TimeEntry;
use crate::utils::colors::{BOLD, GREY, RESET, pad_optional};
use crate::utils::date::{self, history_start, parse_iso_date};
use crate::utils::duration::{DurationFormat, format_duration};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { all, json } = cmd {
        let pool = DbPool::open(&cfg.store_paths())?;

        let since = if *all {
            None
        } else {
            Some(history_start(date::now(), cfg.history_days))
        };

        let entries = load_entries(&pool.conn, since)?;

        if *json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        } else {
            print_entries(&entries);
        }
    }
    Ok(())
}

fn print_entries(entries: &[TimeEntry]) {
    if entries.is_empty() {
        println!("No time entries recorded.");
        return;
    }

    let mut current_date: Option<&str> = None;
    for e in entries {
        if current_date != Some(e.date.as_str()) {
            let weekday = parse_iso_date(&e.date)
                .map(|d| d.format("%a").to_string())
                .unwrap_or_default();
            println!("\n{BOLD}{} {}{RESET}", weekday, e.date);
            current_date = Some(e.date.as_str());
        }

        println!(
            "  {GREY}#{:<5}{RESET} {} {} {} {:>9}  {}",
            e.id.unwrap_or_default(),
            pad_optional(&e.entity, 16),
            pad_optional(&e.project, 16),
            pad_optional(&e.sub_project, 16),
            format_duration(e.duration, DurationFormat::PADDED),
            e.description
        );
    }
}
