//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `etomyte-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `ContentProvider`: read-only fragment lookup
//!   - `Filesystem`: file operations for project scaffolding
//!
//! - **Driving (Input) Ports**: `PageRenderer::render`, called by the CLI and
//!   the HTTP binding

pub mod output;

pub use output::{ContentProvider, Filesystem};

#[cfg(test)]
pub use output::{MockContentProvider, MockFilesystem};
