use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use crate::domain::error::DomainError;

/// Directories and files written by `etomyte new`, relative to `root`.
#[derive(Debug, Clone)]
pub struct ProjectSkeleton {
    root: PathBuf,
    entries: Vec<FsEntry>,
}

impl ProjectSkeleton {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: Vec::new(),
        }
    }

    pub fn with_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.entries.push(FsEntry::Directory(DirectoryToCreate { path: path.into() }));
        self
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.entries.push(FsEntry::File(FileToWrite {
            path: path.into(),
            content: content.into(),
        }));
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entries(&self) -> &[FsEntry] {
        &self.entries
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn files(&self) -> impl Iterator<Item = &FileToWrite> {
        self.entries.iter().filter_map(|entry| match entry {
            FsEntry::File(file) => Some(file),
            FsEntry::Directory(_) => None,
        })
    }

    /// Every entry must stay inside `root` and appear once.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.entries.is_empty() {
            return Err(DomainError::InvalidSkeleton("nothing to write".into()));
        }

        let mut seen = HashSet::new();
        for entry in &self.entries {
            let path = entry.path();
            let shown = path.display().to_string();

            if path.is_absolute() {
                return Err(DomainError::AbsolutePathNotAllowed { path: shown });
            }
            if path.components().any(|c| c == Component::ParentDir) {
                return Err(DomainError::InvalidSkeleton(format!(
                    "'{shown}' leaves the project root"
                )));
            }
            if !seen.insert(path) {
                return Err(DomainError::DuplicatePath { path: shown });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum FsEntry {
    File(FileToWrite),
    Directory(DirectoryToCreate),
}

impl FsEntry {
    pub fn path(&self) -> &Path {
        match self {
            FsEntry::File(file) => &file.path,
            FsEntry::Directory(dir) => &dir.path,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileToWrite {
    pub path: PathBuf,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct DirectoryToCreate {
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_skeleton_is_invalid() {
        assert!(ProjectSkeleton::new("site").validate().is_err());
    }

    #[test]
    fn duplicate_paths_rejected() {
        let skeleton = ProjectSkeleton::new("site")
            .with_directory("contents")
            .with_directory("contents");
        assert!(matches!(skeleton.validate(), Err(DomainError::DuplicatePath { .. })));
    }

    #[test]
    fn paths_must_stay_under_root() {
        let absolute = ProjectSkeleton::new("site").with_file("/etc/passwd", "x");
        assert!(matches!(
            absolute.validate(),
            Err(DomainError::AbsolutePathNotAllowed { .. })
        ));

        let escaping = ProjectSkeleton::new("site").with_file("contents/../../x.md", "x");
        assert!(matches!(escaping.validate(), Err(DomainError::InvalidSkeleton(_))));
    }

    #[test]
    fn files_skip_directories() {
        let skeleton = ProjectSkeleton::new("site")
            .with_directory("snippets")
            .with_file("contents/index.md", "# Hi");
        assert!(skeleton.validate().is_ok());
        assert_eq!(skeleton.files().count(), 1);
        assert_eq!(skeleton.entry_count(), 2);
    }
}
