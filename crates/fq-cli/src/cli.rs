//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use fq_core::{Direction, TimeWindow};

/// Float data explorer.
///
/// Searches, filters and sorts float observations and the activity log,
/// from the built-in samples or a JSON snapshot.
#[derive(Debug, Parser)]
#[command(name = "fq", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Reference time for windows and relative labels.
    ///
    /// ISO 8601 (e.g. 2025-03-14T12:00:00Z), a bare UTC date (2025-03-14) or
    /// relative (e.g. '2 hours ago').
    /// Defaults to the current time.
    #[arg(long, global = true)]
    pub now: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Query float observations.
    Floats(FloatsArgs),

    /// Query the activity history.
    History(HistoryArgs),

    /// List the fields a dataset can be filtered and sorted by.
    Fields {
        #[arg(value_enum)]
        dataset: Dataset,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Which record schema a command works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Dataset {
    Floats,
    History,
}

/// Search, filter and sort options shared by every dataset.
#[derive(Debug, Clone, Default, Args)]
pub struct QueryArgs {
    /// JSON file holding an array of records. Defaults to the built-in sample.
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Case-insensitive text to look for.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Exact-match constraint; `all` disables it. Repeatable.
    #[arg(short, long = "filter", value_name = "FIELD=VALUE")]
    pub filters: Vec<String>,

    /// Time window: all, today, last-7-days or last-30-days.
    #[arg(short, long)]
    pub window: Option<TimeWindow>,

    /// Field to sort by.
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort ascending.
    #[arg(long, conflicts_with = "desc")]
    pub asc: bool,

    /// Sort descending.
    #[arg(long)]
    pub desc: bool,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

impl QueryArgs {
    /// The direction requested on the command line, if any.
    pub const fn direction(&self) -> Option<Direction> {
        if self.asc {
            Some(Direction::Ascending)
        } else if self.desc {
            Some(Direction::Descending)
        } else {
            None
        }
    }
}

/// Options for `fq floats`.
#[derive(Debug, Clone, Default, Args)]
pub struct FloatsArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Float status: active, inactive, delayed or all.
    #[arg(long)]
    pub status: Option<String>,
}

/// Options for `fq history`.
#[derive(Debug, Clone, Default, Args)]
pub struct HistoryArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Activity type: query, visualization, export, download or all.
    #[arg(long = "type", value_name = "TYPE")]
    pub kind: Option<String>,

    /// Only favorites.
    #[arg(long)]
    pub favorites: bool,
}
