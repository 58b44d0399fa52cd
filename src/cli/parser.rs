use clap::{Parser, Subcommand};

/// Command-line interface definition for tempus
#[derive(Parser)]
#[command(
    name = "tempus",
    version = env!("CARGO_PKG_VERSION"),
    about = "Personal time tracking: log time per entity/project and summarize it, using SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override the data directory (holds tempus.sqlite and any legacy tempus.tdb)
    #[arg(global = true, long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<String>,

    /// Print diagnostic logging to stderr
    #[arg(global = true, long, short = 'v')]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a legacy tempus.tdb store (runs automatically before every other command)
    Migrate,

    /// Show total time per entity / project / sub-project
    Summary {
        #[arg(long, help = "Print the summary rows as JSON")]
        json: bool,
    },

    /// List time entries, newest first
    List {
        #[arg(long, short = 'a', help = "Show all entries, not only the history window")]
        all: bool,

        #[arg(long, help = "Print the entries as JSON")]
        json: bool,
    },

    /// Record a time entry, or update one with --id
    Add {
        #[arg(long, help = "Entity (company/client) the time is booked against")]
        entity: String,

        #[arg(long)]
        project: String,

        #[arg(long = "sub-project", default_value = "")]
        sub_project: String,

        #[arg(long, value_name = "HH:MM:SS", help = "Time spent")]
        duration: String,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long, value_name = "YYYY-MM-DD", help = "Defaults to the current working day")]
        date: Option<String>,

        #[arg(long, help = "Update the entry with this id instead of adding one")]
        id: Option<i64>,
    },

    /// Show or create the configuration file
    Config {
        #[arg(long = "print", help = "Print the effective configuration")]
        print_config: bool,

        #[arg(long = "init", help = "Write the effective configuration to the config file")]
        init: bool,
    },
}
