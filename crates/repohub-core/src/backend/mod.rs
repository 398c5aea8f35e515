//! Repository backend seam.
//!
//! The hub never interprets repository history itself. It only asks a backend
//! three questions about a candidate directory: does it host a repository,
//! what is that repository's identifier, and can an empty repository be
//! initialized there.

mod hg_command;
mod mercurial;

pub use hg_command::HgCommand;
pub use mercurial::MercurialStore;

use crate::config::HgLayout;
use crate::error::Result;
use std::path::{Path, PathBuf};

/// Operations the hub needs from the version-control backend.
///
/// All methods are blocking; callers run them off the async dispatch path.
pub trait RepositoryBackend: Send + Sync {
    /// Short name used in status output and logs.
    fn name(&self) -> &'static str;

    /// Whether `dir` carries repository metadata.
    fn is_repository(&self, dir: &Path) -> bool {
        metadata_dir(dir).is_dir()
    }

    /// Identifier of the repository in `dir`.
    ///
    /// Returns `Ok(None)` when the repository exists but has no content yet.
    fn identifier(&self, dir: &Path) -> Result<Option<String>>;

    /// Initialize an empty repository in the existing directory `dir`.
    ///
    /// Must be idempotent: a directory that already holds an empty or
    /// partially initialized repository is completed, not rejected.
    fn init(&self, dir: &Path) -> Result<()>;
}

/// `<dir>/.hg`
pub fn metadata_dir(dir: &Path) -> PathBuf {
    dir.join(HgLayout::METADATA_DIR)
}

/// `<dir>/.hg/store/data`, where tracked files have their revlog indexes.
pub fn content_index_dir(dir: &Path) -> PathBuf {
    metadata_dir(dir)
        .join(HgLayout::STORE_DIR)
        .join(HgLayout::DATA_DIR)
}

/// Which backend implementation to use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendKind {
    /// Read and write the store layout directly.
    Native,
    /// Delegate to an `hg` executable.
    Command { program: PathBuf },
}

impl BackendKind {
    /// Build the configured backend.
    pub fn build(&self) -> Box<dyn RepositoryBackend> {
        match self {
            BackendKind::Native => Box::new(MercurialStore::new()),
            BackendKind::Command { program } => Box::new(HgCommand::new(program.clone())),
        }
    }
}

impl Default for BackendKind {
    fn default() -> Self {
        BackendKind::Native
    }
}
