use clap::{Parser, Subcommand};

/// Command-line interface definition for exptracker
#[derive(Parser)]
#[command(
    name = "exptracker",
    version = env!("CARGO_PKG_VERSION"),
    about = "Measure leaderboard experience gains per session and build monthly reports",
    long_about = None
)]
pub struct Cli {
    /// Project root holding config/, data/ and reports/
    #[arg(global = true, long = "root", default_value = ".")]
    pub root: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the directory layout, default config and empty logs
    Init,

    /// Run one measurement session (sample, wait, sample again)
    Track {
        /// Dungeon / location key (validated against config/dungeons.json when present)
        #[arg(long, visible_alias = "dungeon")]
        location: String,

        /// Stage number inside the location
        #[arg(long)]
        stage: u32,

        /// Difficulty label
        #[arg(long)]
        difficulty: String,

        /// Party composition, e.g. solo, duo, full
        #[arg(long = "party-type")]
        party_type: String,

        /// Farming spot label used as an extra grouping in reports
        #[arg(long, default_value = "")]
        spot: String,

        /// Free-text note stored with the session
        #[arg(long, default_value = "")]
        note: String,

        /// Seconds between the two samples (overrides config)
        #[arg(long = "wait-seconds", visible_alias = "sleep-seconds")]
        wait_seconds: Option<u64>,
    },

    /// Build the monthly report from the logs
    Report {
        /// Month to report (YYYY-MM). Defaults to the previous month.
        #[arg(long)]
        month: Option<String>,

        /// Do not push the digest to the configured webhook
        #[arg(long = "no-notify")]
        no_notify: bool,
    },

    /// Show whether a session currently holds the lock
    Status,
}
