//! Command handlers, one module per subcommand.

use std::{path::Path, sync::Arc};

use tracing::debug;

use etomyte_adapters::FileSystemProvider;
use etomyte_core::application::PageRenderer;

use crate::{
    config::AppConfig,
    error::{CliError, CliResult},
};

pub mod completions;
pub mod config;
pub mod list;
pub mod new;
pub mod render;
pub mod serve;

/// Content provider for the site at `project`, using configured extensions.
pub fn open_site(project: &Path, config: &AppConfig) -> CliResult<FileSystemProvider> {
    if !project.is_dir() {
        return Err(CliError::ProjectNotFound {
            path: project.to_path_buf(),
        });
    }
    debug!(project = %project.display(), "Opening site");
    Ok(FileSystemProvider::new(project).with_extensions(config.provider_extensions()))
}

/// Page renderer over the site at `project`.
pub fn site_renderer(project: &Path, config: &AppConfig) -> CliResult<PageRenderer> {
    let provider = open_site(project, config)?;
    Ok(PageRenderer::new(Arc::new(provider), config.engine_settings()))
}
