//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use etomyte_core::domain::FragmentClass;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "etomyte",
    bin_name = "etomyte",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Minimal flat-file CMS",
    long_about = "Etomyte renders pages from plain files: hierarchical content, \
                  templates inherited from the nearest ancestor, and snippets \
                  expanded from [[name?key=value]] markers.",
    after_help = "EXAMPLES:\n\
        \x20 etomyte new my-site\n\
        \x20 etomyte -p my-site render /about\n\
        \x20 etomyte -p my-site serve --port 8080\n\
        \x20 etomyte -p my-site list snippets --format json",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new site from the starter project.
    #[command(
        visible_alias = "n",
        about = "Create a new site",
        after_help = "EXAMPLES:\n\
            \x20 etomyte new my-site\n\
            \x20 etomyte new my-site --title \"My Site\"\n\
            \x20 etomyte new existing-dir --force"
    )]
    New(NewArgs),

    /// Render one page to stdout.
    #[command(
        visible_alias = "r",
        about = "Render a page",
        after_help = "EXAMPLES:\n\
            \x20 etomyte render /\n\
            \x20 etomyte render /product/cars --format json"
    )]
    Render(RenderArgs),

    /// Serve the site over HTTP.
    #[command(
        about = "Serve the site over HTTP",
        after_help = "EXAMPLES:\n\
            \x20 etomyte serve\n\
            \x20 etomyte serve --host 0.0.0.0 --port 8080"
    )]
    Serve(ServeArgs),

    /// List pages, templates or snippets.
    #[command(
        visible_alias = "ls",
        about = "List site fragments",
        after_help = "EXAMPLES:\n\
            \x20 etomyte list\n\
            \x20 etomyte list pages\n\
            \x20 etomyte list snippets --format csv"
    )]
    List(ListArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 etomyte completions bash > ~/.local/share/bash-completion/completions/etomyte\n\
            \x20 etomyte completions zsh  > ~/.zfunc/_etomyte\n\
            \x20 etomyte completions fish > ~/.config/fish/completions/etomyte.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the effective configuration.
    #[command(
        about = "Configuration inspection",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 etomyte config get server.port\n\
            \x20 etomyte config list\n\
            \x20 etomyte config path"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `etomyte new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Directory to create.  A plain name creates `./name`.
    #[arg(value_name = "PATH", help = "Site directory to create")]
    pub path: PathBuf,

    /// Site title written into the starter template.
    #[arg(
        short = 't',
        long = "title",
        value_name = "TITLE",
        help = "Site title (default: directory name)"
    )]
    pub title: Option<String>,

    /// Write into an existing directory.
    #[arg(long = "force", help = "Write into an existing directory")]
    pub force: bool,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,
}

// ── render ────────────────────────────────────────────────────────────────────

/// Arguments for `etomyte render`.
#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Request path, e.g. `/product/cars`.
    #[arg(value_name = "PATH", default_value = "/", help = "Request path to render")]
    pub path: String,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "html",
        help = "Output format"
    )]
    pub format: RenderFormat,
}

/// Output format for the `render` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RenderFormat {
    /// Page body only; status on stderr.
    Html,
    /// `{"status": .., "body": ..}`.
    Json,
}

// ── serve ─────────────────────────────────────────────────────────────────────

/// Arguments for `etomyte serve`.
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Interface to bind (overrides `server.host`).
    #[arg(long = "host", value_name = "HOST", help = "Interface to bind")]
    pub host: Option<String>,

    /// Port to bind (overrides `server.port`).
    #[arg(long = "port", value_name = "PORT", help = "Port to bind")]
    pub port: Option<u16>,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `etomyte list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Which fragments to list; all three when omitted.
    #[arg(value_enum, help = "Fragment kind to list")]
    pub kind: Option<ListKind>,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Fragment kind accepted by `etomyte list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListKind {
    #[value(alias = "contents")]
    Pages,
    Templates,
    Snippets,
}

impl ListKind {
    pub const ALL: [ListKind; 3] = [Self::Pages, Self::Templates, Self::Snippets];

    pub fn class(self) -> FragmentClass {
        match self {
            Self::Pages => FragmentClass::Content,
            Self::Templates => FragmentClass::Template,
            Self::Snippets => FragmentClass::Snippet,
        }
    }
}

impl std::fmt::Display for ListKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pages => write!(f, "pages"),
            Self::Templates => write!(f, "templates"),
            Self::Snippets => write!(f, "snippets"),
        }
    }
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON object keyed by kind.
    Json,
    /// CSV rows.
    Csv,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `etomyte completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `etomyte config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `server.port` or `site.context.author`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn list_kind_maps_to_fragment_class() {
        assert_eq!(ListKind::Pages.class(), FragmentClass::Content);
        assert_eq!(ListKind::Templates.class(), FragmentClass::Template);
        assert_eq!(ListKind::Snippets.class(), FragmentClass::Snippet);
        assert_eq!(ListKind::Snippets.to_string(), "snippets");
    }

    #[test]
    fn render_defaults_to_root_and_html() {
        let cli = Cli::parse_from(["etomyte", "render"]);
        match cli.command {
            Commands::Render(args) => {
                assert_eq!(args.path, "/");
                assert_eq!(args.format, RenderFormat::Html);
            }
            other => panic!("expected Render, got {other:?}"),
        }
    }

    #[test]
    fn project_flag_is_global() {
        let cli = Cli::parse_from(["etomyte", "render", "/about", "-p", "site"]);
        assert_eq!(cli.global.project_dir(), PathBuf::from("site"));
    }

    #[test]
    fn serve_overrides_parse() {
        let cli = Cli::parse_from(["etomyte", "serve", "--host", "0.0.0.0", "--port", "9000"]);
        if let Commands::Serve(args) = cli.command {
            assert_eq!(args.host.as_deref(), Some("0.0.0.0"));
            assert_eq!(args.port, Some(9000));
        } else {
            panic!("expected Serve command");
        }
    }

    #[test]
    fn contents_alias_for_pages() {
        let cli = Cli::parse_from(["etomyte", "list", "contents"]);
        if let Commands::List(args) = cli.command {
            assert_eq!(args.kind, Some(ListKind::Pages));
        } else {
            panic!("expected List command");
        }
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["etomyte", "--quiet", "--verbose", "list"]);
        assert!(result.is_err());
    }
}
