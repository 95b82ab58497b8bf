//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use supl_core::settings::EngineSettings;

/// supl - Substitution exports turned into clean daily reports
#[derive(Debug, Parser)]
#[command(name = "supl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "SUPL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Process an export and print the report as JSON
    Process(ProcessArgs),

    /// Print whether an export is a students or teachers export
    Detect {
        /// Export file
        file: PathBuf,
    },

    /// Resolve a time interval to teaching periods
    Periods {
        /// Start time (`HH:MM` or an ISO-8601 date-time)
        from: String,

        /// End time (`HH:MM` or an ISO-8601 date-time)
        to: String,

        /// chrono format of bare times, instead of `HH:MM` / ISO-8601 detection
        #[arg(long)]
        format: Option<String>,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Arguments of the `process` command.
#[derive(Debug, Clone, Default, Args)]
pub struct ProcessArgs {
    /// Export file
    pub file: PathBuf,

    /// Only report these classes (comma separated, can be repeated)
    #[arg(long, value_delimiter = ',')]
    pub include: Vec<String>,

    /// Never report these classes (comma separated, can be repeated)
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Drop the include/exclude lists of the configuration file
    #[arg(long)]
    pub clear: bool,

    /// Last period of the day; later lessons are dropped or shortened
    #[arg(long, alias = "day-end-hour")]
    pub day_end_period: Option<u32>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl ProcessArgs {
    /// Applies the command-line overrides on top of configured settings.
    ///
    /// Classes given on the command line are upper-cased and appended to the
    /// configured lists (or replace them with `--clear`).
    pub fn apply(&self, mut settings: EngineSettings) -> EngineSettings {
        if self.clear {
            settings.include.clear();
            settings.exclude.clear();
        }

        settings = settings
            .with_include(upper(&self.include))
            .with_exclude(upper(&self.exclude));

        if self.day_end_period.is_some() {
            settings = settings.with_day_end_period(self.day_end_period);
        }
        settings
    }
}

fn upper(classes: &[String]) -> Vec<String> {
    classes
        .iter()
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty())
        .collect()
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}
