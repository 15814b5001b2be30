//! Infrastructure adapters for Etomyte.
//!
//! This crate implements the ports defined in `etomyte-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod markdown;
pub mod provider;
pub mod starter;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use provider::{Extensions, FileSystemProvider, InMemoryProvider};
