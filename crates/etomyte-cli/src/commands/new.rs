//! Implementation of the `etomyte new` command.
//!
//! Responsibility: turn CLI arguments into a starter [`ProjectSkeleton`],
//! hand it to the core project service, and display results.

use std::path::Path;

use tracing::{debug, info, instrument};

use etomyte_adapters::{LocalFilesystem, starter::starter_project};
use etomyte_core::{
    application::ProjectService,
    domain::{FsEntry, ProjectSkeleton},
};

use crate::{
    cli::NewArgs,
    config::{AppConfig, SiteConfig},
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `etomyte new` command.
///
/// 1. Derive the site title from `--title` or the directory name
/// 2. Serialise the starter `etomyte.toml`
/// 3. Early-exit if `--dry-run`
/// 4. Write the skeleton via `ProjectService`
/// 5. Print next-steps guidance
#[instrument(skip_all, fields(path = %args.path.display()))]
pub fn execute(args: NewArgs, output: OutputManager) -> CliResult<()> {
    let title = resolve_title(&args)?;
    let config = starter_config(&title)?;
    let skeleton = starter_project(&args.path, &title, &config);
    debug!(title = %title, entries = skeleton.entry_count(), "Skeleton built");

    if args.dry_run {
        output.info(&format!(
            "Dry run: would create '{}' at {}",
            title,
            args.path.display()
        ))?;
        for line in describe(&skeleton) {
            output.info(&format!("  {line}"))?;
        }
        return Ok(());
    }

    if args.force && args.path.exists() {
        output.warning(&format!(
            "{} exists; writing into it",
            args.path.display()
        ))?;
    }
    output.header(&format!("Creating '{title}'..."))?;
    info!(path = %args.path.display(), force = args.force, "Scaffold started");

    ProjectService::new(Box::new(LocalFilesystem::new())).create(&skeleton, args.force)?;

    info!("Scaffold completed");
    output.success(&format!("Site '{title}' created at {}", args.path.display()))?;

    if !output.is_quiet() {
        output.print("")?;
        output.print("Next steps:")?;
        output.print(&format!("  etomyte -p {} render /", args.path.display()))?;
        output.print(&format!("  etomyte -p {} serve", args.path.display()))?;
    }

    Ok(())
}

/// `--title`, or the last component of the target path.
fn resolve_title(args: &NewArgs) -> CliResult<String> {
    if let Some(title) = &args.title {
        let title = title.trim();
        if title.is_empty() {
            return Err(CliError::InvalidInput {
                message: "site title cannot be empty".into(),
                source: None,
            });
        }
        return Ok(title.to_string());
    }
    dir_name(&args.path)
}

fn dir_name(path: &Path) -> CliResult<String> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CliError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "cannot derive a site name from it".into(),
        })?;

    if name.starts_with('.') {
        return Err(CliError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "name cannot start with '.'".into(),
        });
    }
    Ok(name.to_string())
}

/// `etomyte.toml` for a fresh site: defaults plus the site name.
fn starter_config(title: &str) -> CliResult<String> {
    let config = AppConfig {
        site: SiteConfig {
            name: title.to_string(),
            ..SiteConfig::default()
        },
        ..AppConfig::default()
    };
    let body = toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise starter config: {e}"),
        source: Some(Box::new(e)),
    })?;
    Ok(format!(
        "# Etomyte site configuration.\n\
         # Any key can be overridden with ETOMYTE__SECTION__KEY.\n\n{body}"
    ))
}

fn describe(skeleton: &ProjectSkeleton) -> Vec<String> {
    skeleton
        .entries()
        .iter()
        .map(|entry| match entry {
            FsEntry::Directory(dir) => format!("{}/", dir.path.display()),
            FsEntry::File(file) => file.path.display().to_string(),
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
