//! Output management and formatting.
//!
//! Status lines (`✓`, `⚠`, `ℹ`) go to stdout and respect `--quiet`.
//! [`OutputManager::emit`] writes primary command output (a rendered page,
//! a JSON document) and is never suppressed.

use std::io::{self, IsTerminal};

use clap::ValueEnum;
use console::Term;
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Manages CLI output based on configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
    err_term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        // Auto resolves to `output.format` on a TTY, Plain when piped.
        let resolved_format = if args.output_format == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                configured_format(&config.output.format)
            } else {
                OutputFormat::Plain
            }
        } else {
            args.output_format
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
            err_term: Term::stderr(),
        }
    }

    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Primary output, written verbatim to stdout even in quiet mode.
    pub fn emit(&self, data: &str) -> io::Result<()> {
        self.term.write_str(data)?;
        if !data.ends_with('\n') {
            self.term.write_line("")?;
        }
        Ok(())
    }

    /// Pretty JSON document on stdout, never suppressed.
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), crate::error::CliError> {
        let text = serde_json::to_string_pretty(value)?;
        self.emit(&text)?;
        Ok(())
    }

    /// Side-channel note on stderr, e.g. the status of a rendered page.
    pub fn note(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.err_term.write_line(msg)
    }

    /// `✓ <msg>` in green.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.status(Status::Success, msg)
    }

    /// `⚠ <msg>` in yellow.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.status(Status::Warning, msg)
    }

    /// `ℹ <msg>` in blue.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.status(Status::Info, msg)
    }

    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        if self.no_color {
            self.term.write_line(text)
        } else {
            self.term.write_line(&text.cyan().bold().to_string())
        }
    }

    fn status(&self, kind: Status, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let symbol = kind.symbol();
        let line = match (self.no_color, kind) {
            (true, _) => format!("{symbol} {msg}"),
            (false, Status::Success) => format!("{} {}", symbol.green().bold(), msg.green()),
            (false, Status::Warning) => format!("{} {}", symbol.yellow().bold(), msg.yellow()),
            (false, Status::Info) => format!("{} {}", symbol.blue().bold(), msg.blue()),
        };
        self.term.write_line(&line)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// `true` if ANSI colours are enabled.
    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    /// `true` if quiet mode suppresses most output.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// The resolved (non-Auto) output format.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }

    /// `true` when `--output-format json` was requested.
    pub fn wants_json(&self) -> bool {
        self.format() == OutputFormat::Json
    }
}

#[derive(Debug, Clone, Copy)]
enum Status {
    Success,
    Warning,
    Info,
}

impl Status {
    fn symbol(self) -> &'static str {
        match self {
            Status::Success => "\u{2713}",
            Status::Warning => "\u{26a0}",
            Status::Info => "\u{2139}",
        }
    }
}

/// `output.format` from config; unknown values and `auto` mean Human.
fn configured_format(raw: &str) -> OutputFormat {
    match <OutputFormat as ValueEnum>::from_str(raw, true) {
        Ok(OutputFormat::Auto) | Err(_) => OutputFormat::Human,
        Ok(format) => format,
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_manager(quiet: bool, no_color: bool, format: OutputFormat) -> OutputManager {
        let args = GlobalArgs {
            verbose: 0,
            quiet,
            no_color,
            config: None,
            project: None,
            output_format: format,
        };
        OutputManager::new(&args, &AppConfig::default())
    }

    #[test]
    fn quiet_mode_reported() {
        let out = make_manager(true, true, OutputFormat::Plain);
        assert!(out.is_quiet());
        assert!(out.print("hello").is_ok());
    }

    #[test]
    fn human_format_keeps_color_unless_disabled() {
        assert!(make_manager(false, false, OutputFormat::Human).supports_color());
        assert!(!make_manager(false, true, OutputFormat::Human).supports_color());
    }

    #[test]
    fn plain_and_json_never_colored() {
        assert!(!make_manager(false, false, OutputFormat::Plain).supports_color());
        assert!(!make_manager(false, false, OutputFormat::Json).supports_color());
    }

    #[test]
    fn config_can_disable_color() {
        let args = GlobalArgs {
            verbose: 0,
            quiet: false,
            no_color: false,
            config: None,
            project: None,
            output_format: OutputFormat::Human,
        };
        let mut config = AppConfig::default();
        config.output.no_color = true;
        assert!(!OutputManager::new(&args, &config).supports_color());
    }

    #[test]
    fn configured_format_parses_leniently() {
        assert_eq!(configured_format("plain"), OutputFormat::Plain);
        assert_eq!(configured_format("JSON"), OutputFormat::Json);
        assert_eq!(configured_format("auto"), OutputFormat::Human);
        assert_eq!(configured_format("fancy"), OutputFormat::Human);
    }

    #[test]
    fn json_format_is_detected() {
        let out = make_manager(false, true, OutputFormat::Json);
        assert_eq!(out.format(), OutputFormat::Json);
        assert!(out.wants_json());
    }
}
