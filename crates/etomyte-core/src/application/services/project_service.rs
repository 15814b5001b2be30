//! Project Service - writes a new site skeleton.
//!
//! Writes every entry of a [`ProjectSkeleton`] through the [`Filesystem`] port.
//! When a write fails and the service created the root directory itself, the
//! root is removed again.

use std::path::Path;

use tracing::{info, instrument, warn};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{FsEntry, ProjectSkeleton},
    error::{EtomyteError, EtomyteResult},
};

pub struct ProjectService {
    filesystem: Box<dyn Filesystem>,
}

impl ProjectService {
    pub fn new(filesystem: Box<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Write `skeleton` under its root.
    ///
    /// An existing root is refused unless `force` is set; with `force`, files
    /// are written into it and nothing pre-existing is removed on failure.
    #[instrument(skip_all, fields(root = %skeleton.root().display(), force = force))]
    pub fn create(&self, skeleton: &ProjectSkeleton, force: bool) -> EtomyteResult<()> {
        skeleton.validate().map_err(EtomyteError::Domain)?;

        let root = skeleton.root();
        let existed = self.filesystem.exists(root);
        if existed && !force {
            return Err(ApplicationError::ProjectExists { path: root.to_path_buf() }.into());
        }

        match self.write_all(skeleton) {
            Ok(()) => {
                info!(entries = skeleton.entry_count(), "Project written");
                Ok(())
            }
            Err(e) if existed => {
                warn!("Write failed inside existing directory, leaving it in place");
                Err(e)
            }
            Err(e) => {
                warn!("Write failed, attempting rollback");
                self.rollback(root)?;
                Err(e)
            }
        }
    }

    fn write_all(&self, skeleton: &ProjectSkeleton) -> EtomyteResult<()> {
        let root = skeleton.root();
        self.filesystem.create_dir_all(root)?;

        for entry in skeleton.entries() {
            match entry {
                FsEntry::Directory(dir) => {
                    self.filesystem.create_dir_all(&root.join(&dir.path))?;
                }
                FsEntry::File(file) => {
                    let path = root.join(&file.path);
                    if let Some(parent) = path.parent() {
                        self.filesystem.create_dir_all(parent)?;
                    }
                    self.filesystem.write_file(&path, &file.content)?;
                }
            }
        }

        Ok(())
    }

    fn rollback(&self, root: &Path) -> EtomyteResult<()> {
        self.filesystem.remove_dir_all(root).map_err(|e| {
            warn!(error = %e, path = %root.display(), "Rollback failed");
            EtomyteError::from(ApplicationError::RollbackFailed {
                path: root.to_path_buf(),
                reason: e.to_string(),
            })
        })?;
        info!("Rollback successful");
        Ok(())
    }
}
