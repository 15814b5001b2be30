//! Application layer errors.
//!
//! These errors represent failures in resolution and orchestration.
//! Pure domain failures are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ScriptError;
use crate::error::ErrorCategory;

/// Errors that occur while resolving pages or writing projects.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// No ancestor template and no default template exist.
    #[error("No template found for '{path}'")]
    TemplateNotFound { path: String },

    /// A marker references a snippet with no backing fragment.
    #[error("Snippet '{name}' not found")]
    SnippetNotFound { name: String },

    /// A snippet script failed to parse or run.
    #[error("Snippet '{name}' failed: {source}")]
    SnippetEvaluation {
        name: String,
        #[source]
        source: ScriptError,
    },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Provider or store access failed (lock poisoned).
    #[error("Content store lock poisoned")]
    ProviderLockError,

    /// Project already exists at target location.
    #[error("Project already exists at {path}")]
    ProjectExists { path: PathBuf },

    /// Rollback failed (best-effort cleanup failed).
    #[error("Rollback failed for {path}: {reason}")]
    RollbackFailed { path: PathBuf, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TemplateNotFound { path } => vec![
                format!("No template matches '{}' or any of its parents", path),
                "Add templates/index.html or set site.default_template".into(),
            ],
            Self::SnippetNotFound { name } => vec![
                format!("Create snippets/{}.snip (script) or snippets/{}.html", name, name),
                "Try: etomyte list snippets".into(),
            ],
            Self::SnippetEvaluation { name, source } => vec![
                format!("Fix the script in snippet '{}': {}", name, source),
                "Scripts bind their output with: result = ...".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::ProviderLockError => vec!["Try again in a moment".into()],
            Self::ProjectExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Use --force to write into it anyway".into(),
                "Choose a different project name".into(),
            ],
            Self::RollbackFailed { path, .. } => vec![format!(
                "Remove the partially written directory by hand: {}",
                path.display()
            )],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TemplateNotFound { .. } | Self::SnippetNotFound { .. } => {
                ErrorCategory::NotFound
            }
            Self::SnippetEvaluation { .. } => ErrorCategory::Evaluation,
            Self::ProjectExists { .. } => ErrorCategory::Validation,
            Self::FilesystemError { .. }
            | Self::RollbackFailed { .. }
            | Self::ProviderLockError => ErrorCategory::Internal,
        }
    }
}
