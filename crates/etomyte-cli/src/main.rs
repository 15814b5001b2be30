//! `etomyte`: render, serve and scaffold flat-file sites.
//!
//! Startup runs in a fixed order because each step depends on the previous
//! one: `.env` feeds both logging (`RUST_LOG`) and config (`ETOMYTE__*`),
//! and config feeds the output manager.
//!
//! Exit codes: 0 success, 1 internal, 2 bad input, 3 not found, 4 config.

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info, instrument};

use crate::{
    cli::{Cli, Commands},
    config::AppConfig,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;

/// Exit code for a config file that cannot be read or parsed.
const EXIT_CONFIG: u8 = 4;

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // `--help` and `--version` come through here as well.
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() { ExitCode::from(2) } else { ExitCode::SUCCESS };
        }
    };

    if let Err(e) = init_logging(&cli.global) {
        eprintln!("etomyte: {e:#}");
        return ExitCode::FAILURE;
    }
    debug!(
        command = ?cli.command,
        project = %cli.global.project_dir().display(),
        "Parsed arguments"
    );

    let config = match AppConfig::load(cli.global.config.as_deref(), &cli.global.project_dir()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e:#}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let output = OutputManager::new(&cli.global, &config);
    let report = ErrorReport {
        verbose: cli.global.verbose > 0,
        colored: output.supports_color(),
    };

    match run(cli, config, output) {
        Ok(()) => {
            info!("Done");
            ExitCode::SUCCESS
        }
        Err(e) => report.emit(e),
    }
}

#[instrument(skip_all)]
fn run(cli: Cli, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let Cli { global, command } = cli;
    match command {
        Commands::New(args) => commands::new::execute(args, output),
        Commands::Render(args) => commands::render::execute(args, global, config, output),
        Commands::Serve(args) => commands::serve::execute(args, global, config, output),
        Commands::List(args) => commands::list::execute(args, global, config, output),
        Commands::Completions(args) => commands::completions::execute(args),
        Commands::Config(cmd) => commands::config::execute(cmd, global, config, output),
    }
}

/// How a failed command is reported on stderr.
struct ErrorReport {
    verbose: bool,
    colored: bool,
}

impl ErrorReport {
    fn emit(&self, err: CliError) -> ExitCode {
        err.log();
        let ansi = self.colored && std::io::IsTerminal::is_terminal(&std::io::stderr());
        let text = if ansi {
            err.format_colored(self.verbose)
        } else {
            err.format_plain(self.verbose)
        };
        eprint!("{text}");
        ExitCode::from(err.exit_code())
    }
}
