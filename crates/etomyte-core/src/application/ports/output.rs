//! Driven (output) ports - implemented by infrastructure.
//!
//! The `etomyte-adapters` crate provides implementations.

use std::path::Path;

use crate::domain::{Fragment, FragmentClass, RequestPath};
use crate::error::EtomyteResult;

/// Port for fragment lookup.
///
/// Implemented by:
/// - `etomyte_adapters::provider::FileSystemProvider` (project directory)
/// - `etomyte_adapters::provider::InMemoryProvider` (tests, embedders)
///
/// All lookups are exact matches; hierarchy walking belongs to
/// `TemplateResolver`. Absence is a normal outcome. Storage failures are
/// reported by the adapter as absence.
#[cfg_attr(test, mockall::automock)]
pub trait ContentProvider: Send + Sync {
    /// Content fragment at exactly `path`.
    fn get_content(&self, path: &RequestPath) -> Option<Fragment>;

    /// Template fragment at exactly `path`.
    fn get_template(&self, path: &RequestPath) -> Option<Fragment>;

    /// Snippet by bare name. Only the first path segment of `name` is used.
    fn get_snippet(&self, name: &str) -> Option<Fragment>;

    /// Logical names available for `class`, sorted.
    fn list(&self, class: FragmentClass) -> Vec<String>;
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `etomyte_adapters::filesystem::LocalFilesystem` (production)
/// - `etomyte_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> EtomyteResult<()>;

    /// Write content to a file.
    fn write_file(&self, path: &Path, content: &str) -> EtomyteResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> EtomyteResult<()>;
}

/// Extract the snippet name a provider should look up: the first segment.
pub fn snippet_key(name: &str) -> &str {
    name.split(['/', '\\'])
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_key_takes_first_segment() {
        assert_eq!(snippet_key("nav"), "nav");
        assert_eq!(snippet_key("/nav/extra"), "nav");
        assert_eq!(snippet_key(""), "");
    }
}
