//! Application layer for Etomyte.
//!
//! This layer contains:
//! - **Services**: use case orchestration (PageRenderer, TemplateResolver,
//!   SnippetEngine, ProjectService)
//! - **Ports**: interface definitions (traits) for external dependencies
//! - **Settings**: immutable engine configuration
//! - **Errors**: application-specific error types

pub mod error;
pub mod ports;
pub mod services;
pub mod settings;

pub use services::{PageRenderer, ProjectService, ResolvedTemplate, SnippetEngine, TemplateResolver};

pub use ports::{ContentProvider, Filesystem};

pub use settings::{AppContext, BUILTIN_NOT_FOUND_BODY, EngineSettings};

pub use error::ApplicationError;
