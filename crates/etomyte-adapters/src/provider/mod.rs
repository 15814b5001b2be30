//! Content provider adapters.

mod filesystem;
mod memory;

pub use filesystem::{Extensions, FileSystemProvider, SCRIPT_EXTENSION};
pub use memory::InMemoryProvider;
