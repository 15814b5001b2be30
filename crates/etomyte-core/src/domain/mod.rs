// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Etomyte.
//!
//! Pure logic only: request path normalization, fragment types, the snippet
//! marker grammar and the restricted snippet script evaluator. All storage
//! concerns are reached through ports defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Immutable values**: fragments and paths are Clone + PartialEq
pub mod error;
pub mod fragment;
pub mod marker;
pub mod project;
pub mod request_path;
pub mod script;

pub use error::{DomainError, ErrorCategory, ScriptError};
pub use fragment::{Fragment, FragmentClass, FragmentFormat, RenderResult};
pub use marker::{Marker, SnippetInvocation};
pub use project::{DirectoryToCreate, FileToWrite, FsEntry, ProjectSkeleton};
pub use request_path::{ROOT_NAME, RequestPath};
pub use script::{Bindings, EvalLimits, OUTPUT_VAR, Script};
