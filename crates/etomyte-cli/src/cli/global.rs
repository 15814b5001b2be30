//! Flags shared by every subcommand.
//!
//! Flattened into [`super::Cli`] with `global = true`, so
//! `etomyte render / -p site -v` and `etomyte -p site -v render /` are the same.

use std::path::PathBuf;

use clap::{ArgAction, Args, ValueEnum};

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Site root holding `contents/`, `templates/` and `snippets/`.
    #[arg(
        short = 'p',
        long = "project",
        global = true,
        value_name = "DIR",
        env = "ETOMYTE_PROJECT",
        help = "Site directory (default: current directory)"
    )]
    pub project: Option<PathBuf>,

    /// Explicit config file; replaces `<project>/etomyte.toml`.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "FILE",
        help = "Read configuration from FILE"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true,
        help = "More log output (-v, -vv, -vvv)",
        long_help = "Log level on stderr:
    (none)  - warnings and errors
    -v      - renders and requests
    -vv     - template and snippet resolution
    -vvv    - every fragment lookup"
    )]
    pub verbose: u8,

    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Only print errors and primary output"
    )]
    pub quiet: bool,

    /// Honours `NO_COLOR` (<https://no-color.org>).
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new(),
        help = "Disable ANSI colors"
    )]
    pub no_color: bool,

    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "auto",
        help = "Status line style"
    )]
    pub output_format: OutputFormat,
}

impl GlobalArgs {
    /// `--project`, or the working directory.
    pub fn project_dir(&self) -> PathBuf {
        self.project.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `output.format` on a terminal, `plain` when piped.
    #[default]
    Auto,
    /// Colored status lines.
    Human,
    /// No colors.
    Plain,
    /// Structured output where a command supports it.
    Json,
}
