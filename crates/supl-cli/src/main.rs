//! supl CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use supl_cli::cli::{Cli, Command, ConfigAction};
use supl_cli::commands;
use supl_cli::config::CliConfig;
use supl_cli::error::CliResult;
use supl_core::tracing::{TracingConfig, TracingOutputFormat, init_tracing};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut tracing_config = if cli.debug || config.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::default()
    };
    if cli.log_json {
        tracing_config = tracing_config.with_format(TracingOutputFormat::Json);
    }
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: {}", e);
    }

    match run(cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> CliResult<CliConfig> {
    match cli.config {
        Some(ref path) => CliConfig::load_from(path),
        None => CliConfig::load(),
    }
}

fn run(cli: Cli, config: &CliConfig) -> CliResult<()> {
    match cli.command {
        Command::Process(args) => commands::process::process(&args, config),
        Command::Detect { file } => commands::process::detect(&file),
        Command::Periods { from, to, format } => {
            commands::periods::run(&config.catalogue()?, &from, &to, format.as_deref())
        }
        Command::Config { action } => match action {
            ConfigAction::Dump => commands::config::dump(config),
            ConfigAction::Validate => commands::config::validate(config),
            ConfigAction::Path => commands::config::path(),
        },
    }
}
