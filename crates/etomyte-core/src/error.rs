//! Root error type returned by every public operation of the crate.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Etomyte Core operations.
#[derive(Debug, Error, Clone)]
pub enum EtomyteError {
    /// Errors from the domain layer (bad paths, script failures).
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (resolution and orchestration).
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl EtomyteError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check etomyte.toml and ETOMYTE__* environment variables".into(),
            ],
            Self::Internal { .. } => vec!["This appears to be a bug in Etomyte".into()],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                crate::domain::ErrorCategory::Evaluation => ErrorCategory::Evaluation,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// True for failures raised while resolving a page: a missing template,
    /// a missing snippet or a failing snippet script.
    pub fn is_resolution_failure(&self) -> bool {
        matches!(
            self,
            Self::Application(
                ApplicationError::TemplateNotFound { .. }
                    | ApplicationError::SnippetNotFound { .. }
                    | ApplicationError::SnippetEvaluation { .. }
            )
        )
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Evaluation,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type EtomyteResult<T> = Result<T, EtomyteError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ScriptError;

    #[test]
    fn resolution_failures_are_flagged() {
        let err: EtomyteError = ApplicationError::SnippetNotFound {
            name: "nav".into(),
        }
        .into();
        assert!(err.is_resolution_failure());
        assert_eq!(err.category(), ErrorCategory::NotFound);

        let err: EtomyteError = DomainError::Script(ScriptError::StepLimit(10)).into();
        assert!(!err.is_resolution_failure());
        assert_eq!(err.category(), ErrorCategory::Evaluation);
    }
}
