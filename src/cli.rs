use slamscore::types::prefs::{Theme, ViewMode};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "slamscore",
    version,
    about = "Slam judge scoring: drop the highest and lowest score, sum the rest"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Directory holding history, draft and preferences (overrides storage.dir)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check a typed score without rewriting it
    Validate(ValidateCommand),
    /// Print the canonical form a field is rewritten to on exit
    Normalize(NormalizeCommand),
    /// Calculate a result from one score per judge
    Calc(CalcCommand),
    /// Inspect, prune or export saved results
    #[command(subcommand)]
    History(HistoryCommand),
    /// Show or change display preferences
    #[command(subcommand)]
    Prefs(PrefsCommand),
    /// Interactive scoring session reading commands from stdin
    Session,
}

#[derive(Args)]
pub struct ValidateCommand {
    pub text: String,
}

#[derive(Args)]
pub struct NormalizeCommand {
    pub text: String,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ResultFormat {
    Text,
    Json,
}

#[derive(Args)]
pub struct CalcCommand {
    /// Participant name
    #[arg(long, short, default_value = "")]
    pub name: String,
    /// Save the result to history
    #[arg(long)]
    pub commit: bool,
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: ResultFormat,
    /// One score per judge, as typed (3 to 15 values)
    #[arg(required = true, allow_hyphen_values = true)]
    pub scores: Vec<String>,
}

#[derive(Subcommand)]
pub enum HistoryCommand {
    /// List saved results, newest first
    List,
    /// Delete one saved result
    Remove { id: i64 },
    /// Delete every saved result
    Clear {
        #[arg(long, short)]
        yes: bool,
    },
    /// Export saved results
    Export(ExportCommand),
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ExportFormatArg {
    Csv,
    Json,
}

#[derive(Args)]
pub struct ExportCommand {
    #[arg(long, short, value_enum, default_value = "csv")]
    pub format: ExportFormatArg,
    /// Field delimiter for csv (overrides export.delimiter)
    #[arg(long)]
    pub delimiter: Option<char>,
    /// Write to a file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum PrefsCommand {
    /// Print or set the color theme
    Theme {
        #[arg(value_enum)]
        value: Option<Theme>,
    },
    /// Print or set the history view mode
    View {
        #[arg(value_enum)]
        value: Option<ViewMode>,
    },
}
