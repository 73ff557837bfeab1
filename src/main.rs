mod commands;
mod dates;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use recurrence_core::config::RecurrenceConfig;
use recurrence_core::recurrence::MAX_HORIZON_DAYS;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "recurrence")]
#[command(about = "Track recurring reminders and clear them as they come up")]
struct Cli {
    /// Data file to use instead of the configured one
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List past-due and upcoming reminders
    List {
        /// How many days ahead to look (defaults to horizon_days from the config)
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(..=i64::from(MAX_HORIZON_DAYS)))]
        days: Option<u32>,

        /// Pretend today is this date (YYYY-MM-DD or e.g. "next friday")
        #[arg(long)]
        today: Option<String>,

        /// Print the lists as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a new reminder
    Add {
        description: String,

        /// First occurrence (YYYY-MM-DD or e.g. "tomorrow")
        #[arg(short, long)]
        start: String,

        /// Repeat weekly, monthly or yearly
        #[arg(short, long)]
        every: Option<String>,

        /// Last day a repeat may fall on
        #[arg(long, requires = "every")]
        until: Option<String>,
    },
    /// Mark an occurrence as handled
    Clear { id: String, date: String },
    /// Mark an occurrence as not handled yet
    Unclear { id: String, date: String },
    /// Show all reminder definitions
    Show,
    /// Show config and data file locations
    Config,
}

fn main() -> Result<()> {
    // Logs go to stderr so listings on stdout stay clean.
    // Override with RUST_LOG=debug to see load/save details.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("recurrence=warn,recurrence_core=warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = RecurrenceConfig::load()?;
    let data_path = cli.file.unwrap_or_else(|| config.data_path());
    debug!(path = %data_path.display(), "Using data file");

    match cli.command {
        Commands::List { days, today, json } => {
            let today = match today {
                Some(s) => dates::parse_date(&s)?,
                None => dates::today(),
            };
            let days = days.unwrap_or(config.horizon_days);
            commands::list::run(&data_path, &config, today, days, json)
        }
        Commands::Add {
            description,
            start,
            every,
            until,
        } => commands::add::run(&data_path, description, &start, every.as_deref(), until.as_deref()),
        Commands::Clear { id, date } => commands::clear::run(&data_path, &config, &id, &date, true),
        Commands::Unclear { id, date } => {
            commands::clear::run(&data_path, &config, &id, &date, false)
        }
        Commands::Show => commands::show::run(&data_path),
        Commands::Config => commands::config::run(&data_path, &config),
    }
}
