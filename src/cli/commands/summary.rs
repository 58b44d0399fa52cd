use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::summary::load_summaries;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::SummaryRow;
use crate::utils::colors::{CYAN, RESET, pad_optional};
use crate::utils::duration::{DurationFormat, format_duration};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Summary { json } = cmd {
        let pool = DbPool::open(&cfg.store_paths())?;
        let mut rows = load_summaries(&pool.conn)?;

        // most recent period first
        rows.sort_by_key(|r| std::cmp::Reverse(r.period()));

        if *json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        } else {
            print_summary(&rows);
        }
    }
    Ok(())
}

fn print_summary(rows: &[SummaryRow]) {
    if rows.is_empty() {
        println!("No time entries recorded.");
        return;
    }

    println!(
        "{CYAN}{:<24}  {:<16}  {:<16}  {:<16}  {:>10}{RESET}",
        "PERIOD", "ENTITY", "PROJECT", "SUB-PROJECT", "DURATION"
    );
    for r in rows {
        println!(
            "{:<24}  {}  {}  {}  {:>10}",
            r.period(),
            pad_optional(&r.entity, 16),
            pad_optional(&r.project, 16),
            pad_optional(&r.sub_project, 16),
            format_duration(r.total_duration, DurationFormat::COMPACT)
        );
    }
}
