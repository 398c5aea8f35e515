//! Top-level scan of a root store.

use super::{RepositoryCatalog, RepositoryRecord};
use crate::backend::RepositoryBackend;
use crate::error::{HubError, Result};
use crate::progress::Progress;
use std::fs::{self, ReadDir};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// List identified repositories directly under `root`.
///
/// Fails only when `root` itself cannot be listed. Candidates that are not
/// repositories, have no identifier yet, or cannot be read are left out.
pub fn list_repositories<'a>(
    root: &Path,
    backend: &'a dyn RepositoryBackend,
    progress: &'a dyn Progress,
) -> Result<RepositoryScan<'a>> {
    let entries = fs::read_dir(root).map_err(|e| HubError::lookup(e, root))?;
    progress.verbose(&format!("Scanning {} for repositories", root.display()));
    Ok(RepositoryScan {
        entries,
        backend,
        progress,
    })
}

/// Lazy, single-pass sequence of repository records.
///
/// Enumeration order is whatever the filesystem yields.
pub struct RepositoryScan<'a> {
    entries: ReadDir,
    backend: &'a dyn RepositoryBackend,
    progress: &'a dyn Progress,
}

impl RepositoryScan<'_> {
    fn record_for(&self, path: PathBuf) -> Option<RepositoryRecord> {
        match fs::metadata(&path) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return None,
            Err(e) => {
                self.progress
                    .warning(&format!("Skipping unreadable {}: {}", path.display(), e));
                return None;
            }
        }

        if !self.backend.is_repository(&path) {
            return None;
        }

        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                self.progress
                    .warning(&format!("Skipping {} with non UTF-8 name", path.display()));
                return None;
            }
        };

        match self.backend.identifier(&path) {
            Ok(Some(id)) if !id.is_empty() => Some(RepositoryRecord {
                path,
                name,
                identifier: Some(id),
            }),
            Ok(_) => {
                self.progress
                    .verbose(&format!("{} has no identifier yet", path.display()));
                None
            }
            Err(e) => {
                self.progress
                    .warning(&format!("Skipping {}: {}", path.display(), e));
                None
            }
        }
    }
}

impl Iterator for RepositoryScan<'_> {
    type Item = RepositoryRecord;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    self.progress
                        .warning(&format!("Skipping unreadable directory entry: {}", e));
                    continue;
                }
            };
            if let Some(record) = self.record_for(entry.path()) {
                return Some(record);
            }
        }
    }
}

/// Catalog backed by a directory listing of the root store.
pub struct DirectoryCatalog {
    root: PathBuf,
    backend: Arc<dyn RepositoryBackend>,
}

impl DirectoryCatalog {
    pub fn new(root: impl Into<PathBuf>, backend: Arc<dyn RepositoryBackend>) -> Self {
        Self {
            root: root.into(),
            backend,
        }
    }
}

impl RepositoryCatalog for DirectoryCatalog {
    fn root(&self) -> &Path {
        &self.root
    }

    fn backend(&self) -> &dyn RepositoryBackend {
        self.backend.as_ref()
    }

    fn scan<'a>(
        &'a self,
        progress: &'a dyn Progress,
    ) -> Result<Box<dyn Iterator<Item = RepositoryRecord> + 'a>> {
        Ok(Box::new(list_repositories(
            &self.root,
            self.backend.as_ref(),
            progress,
        )?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MercurialStore;
    use crate::progress::{CapturedProgress, ProgressLevel};
    use std::collections::HashSet;
    use tempfile::TempDir;

    /// Lay down an identified repository with the given node byte.
    fn make_repo(root: &Path, name: &str, node_byte: u8) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        MercurialStore::new().init(&dir).unwrap();
        let mut entry = vec![0u8; 64];
        entry[32..52].copy_from_slice(&[node_byte; 20]);
        fs::write(dir.join(".hg/store/00changelog.i"), entry).unwrap();
        dir
    }

    #[test]
    fn test_scan_reports_identified_repositories_only() {
        let temp = TempDir::new().unwrap();
        make_repo(temp.path(), "alpha", 0xa1);
        make_repo(temp.path(), "beta", 0xb2);

        // empty repository, plain directory and a stray file are all excluded
        let pending = temp.path().join("pending");
        fs::create_dir(&pending).unwrap();
        MercurialStore::new().init(&pending).unwrap();
        fs::create_dir(temp.path().join("notes")).unwrap();
        fs::write(temp.path().join("readme.txt"), "hi").unwrap();

        let backend = MercurialStore::new();
        let progress = CapturedProgress::new();
        let names: HashSet<String> = list_repositories(temp.path(), &backend, &progress)
            .unwrap()
            .map(|r| r.name)
            .collect();

        assert_eq!(names, HashSet::from(["alpha".to_string(), "beta".to_string()]));
    }

    #[test]
    fn test_scan_is_not_recursive() {
        let temp = TempDir::new().unwrap();
        let group = temp.path().join("group");
        fs::create_dir(&group).unwrap();
        make_repo(&group, "nested", 0x42);

        let backend = MercurialStore::new();
        let progress = CapturedProgress::new();
        let count = list_repositories(temp.path(), &backend, &progress)
            .unwrap()
            .count();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_missing_root_is_lookup_error() {
        let temp = TempDir::new().unwrap();
        let backend = MercurialStore::new();
        let progress = CapturedProgress::new();

        let result = list_repositories(&temp.path().join("gone"), &backend, &progress);
        assert!(matches!(result, Err(HubError::Lookup { .. })));
    }

    #[test]
    fn test_unreadable_candidate_is_skipped() {
        let temp = TempDir::new().unwrap();
        make_repo(temp.path(), "good", 0x11);

        // a changelog index that is a directory cannot be read as a file
        let broken = temp.path().join("broken");
        fs::create_dir(&broken).unwrap();
        MercurialStore::new().init(&broken).unwrap();
        fs::create_dir(broken.join(".hg/store/00changelog.i")).unwrap();

        let backend = MercurialStore::new();
        let progress = CapturedProgress::new();
        let records: Vec<_> = list_repositories(temp.path(), &backend, &progress)
            .unwrap()
            .collect();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "good");
        assert!(!progress.texts(ProgressLevel::Warning).is_empty());
    }

    #[test]
    fn test_directory_catalog_finds_by_identifier() {
        let temp = TempDir::new().unwrap();
        let path = make_repo(temp.path(), "gamma", 0xcc);
        let catalog = DirectoryCatalog::new(temp.path(), Arc::new(MercurialStore::new()));
        let progress = CapturedProgress::new();

        let found = catalog
            .find_by_identifier(&"cc".repeat(20), &progress)
            .unwrap()
            .unwrap();
        assert_eq!(found.path, path);
        assert!(catalog
            .find_by_identifier("deadbeef", &progress)
            .unwrap()
            .is_none());
    }
}
