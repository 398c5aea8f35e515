//! Native reader/writer for the Mercurial repository layout.
//!
//! The identifier of a repository is the node id of its first changeset, which
//! never changes once the repository has content. It is read straight out of
//! the first changelog index entry so discovery never spawns a process.

use super::{metadata_dir, RepositoryBackend};
use crate::config::HgLayout;
use crate::error::{HubError, Result};
use std::fs::{self, File};
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Backend that reads and initializes `.hg` directories in-process.
#[derive(Debug, Clone, Copy, Default)]
pub struct MercurialStore;

impl MercurialStore {
    pub fn new() -> Self {
        Self
    }

    /// Requirements listed in `.hg/requires`, or `None` for a layout that
    /// predates the file.
    fn requirements(dir: &Path) -> Result<Option<Vec<String>>> {
        let path = metadata_dir(dir).join(HgLayout::REQUIRES_FILE);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(
                contents
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(String::from)
                    .collect(),
            )),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(HubError::io_with_path(e, path)),
        }
    }

    /// Location of the changelog index for the repository in `dir`.
    fn changelog_index(dir: &Path) -> Result<PathBuf> {
        let uses_store = Self::requirements(dir)?
            .map(|reqs| reqs.iter().any(|r| r == HgLayout::STORE_REQUIREMENT))
            .unwrap_or(false);

        let hg = metadata_dir(dir);
        Ok(if uses_store {
            hg.join(HgLayout::STORE_DIR).join(HgLayout::CHANGELOG_INDEX)
        } else {
            hg.join(HgLayout::CHANGELOG_INDEX)
        })
    }
}

/// Extract the node id of revision 0 from the head of a changelog index.
///
/// Returns `None` when the index holds no complete entry or the node is null.
pub(crate) fn first_node(index_head: &[u8]) -> Option<String> {
    if index_head.len() < HgLayout::INDEX_ENTRY_SIZE {
        return None;
    }
    let node = &index_head[HgLayout::NODE_OFFSET..HgLayout::NODE_OFFSET + HgLayout::NODE_LENGTH];
    if node.iter().all(|b| *b == 0) {
        return None;
    }
    Some(hex::encode(node))
}

impl RepositoryBackend for MercurialStore {
    fn name(&self) -> &'static str {
        "native"
    }

    fn identifier(&self, dir: &Path) -> Result<Option<String>> {
        if !self.is_repository(dir) {
            return Ok(None);
        }

        let index = Self::changelog_index(dir)?;
        let mut file = match File::open(&index) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No changelog yet in {}", dir.display());
                return Ok(None);
            }
            Err(e) => return Err(HubError::io_with_path(e, index)),
        };

        let mut head = Vec::with_capacity(HgLayout::INDEX_ENTRY_SIZE);
        file.by_ref()
            .take(HgLayout::INDEX_ENTRY_SIZE as u64)
            .read_to_end(&mut head)
            .map_err(|e| HubError::io_with_path(e, &index))?;

        Ok(first_node(&head))
    }

    fn init(&self, dir: &Path) -> Result<()> {
        if !dir.is_dir() {
            return Err(HubError::backend(dir, "target is not an existing directory"));
        }

        let hg = metadata_dir(dir);
        let store = hg.join(HgLayout::STORE_DIR);
        fs::create_dir_all(&store)
            .map_err(|e| HubError::backend(dir, format!("cannot create {}: {}", store.display(), e)))?;

        let requires = hg.join(HgLayout::REQUIRES_FILE);
        if !requires.exists() {
            let mut contents = HgLayout::DEFAULT_REQUIREMENTS.join("\n");
            contents.push('\n');
            fs::write(&requires, contents).map_err(|e| {
                HubError::backend(dir, format!("cannot write {}: {}", requires.display(), e))
            })?;
        }

        let guard = hg.join(HgLayout::CHANGELOG_INDEX);
        if !guard.exists() {
            fs::write(&guard, HgLayout::LEGACY_CHANGELOG_GUARD).map_err(|e| {
                HubError::backend(dir, format!("cannot write {}: {}", guard.display(), e))
            })?;
        }

        debug!("Initialized empty repository in {}", dir.display());
        Ok(())
    }
}
