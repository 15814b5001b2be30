//! [`Filesystem`] over the real disk.

use std::io;
use std::path::Path;

use etomyte_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{EtomyteError, EtomyteResult},
};

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> EtomyteResult<()> {
        std::fs::create_dir_all(path).map_err(io_failure(path, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> EtomyteResult<()> {
        std::fs::write(path, content).map_err(io_failure(path, "write file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_dir_all(&self, path: &Path) -> EtomyteResult<()> {
        std::fs::remove_dir_all(path).map_err(io_failure(path, "remove directory"))
    }
}

fn io_failure<'a>(
    path: &'a Path,
    operation: &'a str,
) -> impl FnOnce(io::Error) -> EtomyteError + 'a {
    move |err| {
        ApplicationError::FilesystemError {
            path: path.to_path_buf(),
            reason: format!("cannot {operation}: {err}"),
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_then_remove() {
        let temp = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        let dir = temp.path().join("site/contents");

        fs.create_dir_all(&dir).unwrap();
        fs.write_file(&dir.join("index.md"), "# Hi").unwrap();
        assert!(fs.exists(&dir.join("index.md")));
        assert_eq!(std::fs::read_to_string(dir.join("index.md")).unwrap(), "# Hi");

        fs.remove_dir_all(&temp.path().join("site")).unwrap();
        assert!(!fs.exists(&dir));
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let temp = TempDir::new().unwrap();
        let err = LocalFilesystem::new()
            .write_file(&temp.path().join("nope/file.txt"), "x")
            .unwrap_err();
        assert!(matches!(
            err,
            EtomyteError::Application(ApplicationError::FilesystemError { .. })
        ));
    }
}
