// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (errors cross thread boundaries in the HTTP binding)
/// - Categorizable (for CLI display and HTTP status mapping)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("Invalid request path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Invalid project skeleton: {0}")]
    InvalidSkeleton(String),

    #[error("Duplicate path in project skeleton: {path}")]
    DuplicatePath { path: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    // ========================================================================
    // Script Errors (author-supplied snippet logic)
    // ========================================================================
    #[error(transparent)]
    Script(#[from] ScriptError),
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidPath { path, .. } => vec![
                format!("Request path '{}' cannot be resolved", path),
                "Paths may not contain '..' segments".into(),
            ],
            Self::Script(e) => vec![
                format!("Snippet script failed: {}", e),
                "Check the snippet source for typos or unknown variables".into(),
            ],
            Self::DuplicatePath { path } => vec![
                format!("'{}' appears twice in the starter project", path),
                "This is a bug in the project skeleton".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidPath { .. } => ErrorCategory::Validation,
            Self::Script(_) => ErrorCategory::Evaluation,
            _ => ErrorCategory::Internal,
        }
    }
}

/// Failure raised by the snippet script evaluator.
///
/// Positions are 1-based and refer to the snippet source.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("unknown variable '{0}'")]
    UnknownVariable(String),

    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    #[error("unknown method '{method}' on {receiver}")]
    UnknownMethod { receiver: &'static str, method: String },

    #[error("'{function}' expects {expected} argument(s), got {got}")]
    Arity {
        function: String,
        expected: String,
        got: usize,
    },

    #[error("type error: {0}")]
    Type(String),

    #[error("step budget of {0} exceeded")]
    StepLimit(usize),

    #[error("evaluation exceeded {0} ms")]
    Timeout(u128),

    #[error("string length limit of {0} bytes exceeded")]
    LengthLimit(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Evaluation,
    Internal,
}
