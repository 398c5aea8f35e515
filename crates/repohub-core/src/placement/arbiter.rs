//! Find-or-create arbitration for inbound repositories.

use super::lock::PlacementLock;
use super::naming::{numbered_siblings, unique_sibling_name, validate_directory_name};
use super::{PlacementOutcome, PlacementRequest, PlacementResult};
use crate::backend::RepositoryBackend;
use crate::catalog::RepositoryCatalog;
use crate::error::{HubError, Result};
use crate::progress::Progress;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Decides which directory of a root store receives an inbound repository.
///
/// Existing data is never removed: conflicting repositories are left alone
/// and foreign directories are renamed aside.
pub struct PlacementArbiter {
    catalog: Arc<dyn RepositoryCatalog>,
    /// Serializes placements within this process; the file lock covers
    /// other processes.
    guard: Mutex<()>,
}

impl PlacementArbiter {
    pub fn new(catalog: Arc<dyn RepositoryCatalog>) -> Self {
        Self {
            catalog,
            guard: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        self.catalog.root()
    }

    /// Find or create the directory for `request`.
    ///
    /// Blocking: lists the root store and may create or rename directories.
    pub fn place(
        &self,
        request: &PlacementRequest,
        progress: &dyn Progress,
    ) -> Result<PlacementResult> {
        let name = validate_directory_name(&request.desired_name)?;

        let _guard = self
            .guard
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let _lock = PlacementLock::acquire(self.root())?;

        let result = self.place_locked(name, request.identifier(), progress)?;
        progress.verbose(&format!(
            "Placement of {:?} resolved to {} ({:?})",
            name,
            result.path.display(),
            result.outcome
        ));
        Ok(result)
    }

    fn place_locked(
        &self,
        name: &str,
        identifier: Option<&str>,
        progress: &dyn Progress,
    ) -> Result<PlacementResult> {
        let root = self.root();
        let backend = self.catalog.backend();

        if let Some(id) = identifier {
            if let Some(existing) = self.catalog.find_by_identifier(id, progress)? {
                progress.message(&format!(
                    "Repository {} already present at {}",
                    id,
                    existing.path.display()
                ));
                return Ok(PlacementResult::reused(
                    existing.path,
                    PlacementOutcome::ReusedIdentity,
                ));
            }
        }

        let target = root.join(name);
        let meta = match fs::symlink_metadata(&target) {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                create_repository(&target, backend, progress)?;
                return Ok(PlacementResult::initialized(target, PlacementOutcome::Created));
            }
            Err(e) => return Err(HubError::io_with_path(e, &target)),
        };

        if meta.is_dir() && backend.is_repository(&target) {
            return match backend.identifier(&target)? {
                Some(existing) if identifier.is_some_and(|id| id != existing) => {
                    if let Some(pending) = pending_sibling(root, name, backend)? {
                        progress.message(&format!(
                            "{} holds a different repository, reusing {}",
                            target.display(),
                            pending.display()
                        ));
                        backend.init(&pending)?;
                        return Ok(PlacementResult::initialized(
                            pending,
                            PlacementOutcome::ReusedPendingSibling,
                        ));
                    }
                    let sibling = unique_sibling_name(root, name)?;
                    progress.message(&format!(
                        "{} holds a different repository, using {}",
                        target.display(),
                        sibling.display()
                    ));
                    create_repository(&sibling, backend, progress)?;
                    Ok(PlacementResult::initialized(
                        sibling,
                        PlacementOutcome::CreatedSibling,
                    ))
                }
                Some(_) => Ok(PlacementResult::reused(
                    target,
                    PlacementOutcome::ReusedExisting,
                )),
                None => {
                    // Empty or left half-initialized by an earlier attempt.
                    backend.init(&target)?;
                    Ok(PlacementResult::reused(
                        target,
                        PlacementOutcome::ReusedExisting,
                    ))
                }
            };
        }

        if meta.is_dir() && is_empty_dir(&target)? {
            progress.message(&format!("Preparing empty directory {}", target.display()));
            backend.init(&target)?;
            return Ok(PlacementResult::initialized(
                target,
                PlacementOutcome::InitializedEmpty,
            ));
        }

        let displaced_to = unique_sibling_name(root, name)?;
        progress.warning(&format!(
            "{} holds foreign content, moving it to {}",
            target.display(),
            displaced_to.display()
        ));
        fs::rename(&target, &displaced_to).map_err(|e| HubError::io_with_path(e, &target))?;
        create_repository(&target, backend, progress)?;
        Ok(PlacementResult::initialized(
            target,
            PlacementOutcome::ReplacedForeign { displaced_to },
        ))
    }
}

fn create_repository(
    dir: &Path,
    backend: &dyn RepositoryBackend,
    progress: &dyn Progress,
) -> Result<()> {
    progress.message(&format!("Preparing a place for {}", dir.display()));
    fs::create_dir(dir).map_err(|e| HubError::io_with_path(e, dir))?;
    backend.init(dir)
}

/// First `<name><n>` sibling that is a repository still waiting for content.
fn pending_sibling(
    root: &Path,
    name: &str,
    backend: &dyn RepositoryBackend,
) -> Result<Option<PathBuf>> {
    for sibling in numbered_siblings(root, name)? {
        if sibling.is_dir()
            && backend.is_repository(&sibling)
            && matches!(backend.identifier(&sibling), Ok(None))
        {
            return Ok(Some(sibling));
        }
    }
    Ok(None)
}

fn is_empty_dir(dir: &Path) -> Result<bool> {
    let mut entries = fs::read_dir(dir).map_err(|e| HubError::io_with_path(e, dir))?;
    Ok(entries.next().is_none())
}
