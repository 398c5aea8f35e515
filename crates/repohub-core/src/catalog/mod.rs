//! Catalog of repositories in a root store.
//!
//! The catalog is rebuilt from disk on every call; nothing is cached between
//! scans. `RepositoryCatalog` is the seam where a caching layer would go.

mod scanner;

pub use scanner::{list_repositories, DirectoryCatalog, RepositoryScan};

use crate::backend::RepositoryBackend;
use crate::error::Result;
use crate::progress::Progress;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One candidate directory as seen by the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRecord {
    /// Full path of the candidate directory.
    pub path: PathBuf,
    /// Directory name, used as the repository's human-readable name.
    pub name: String,
    /// Backend identifier; `None` until the repository has content.
    pub identifier: Option<String>,
}

impl RepositoryRecord {
    /// Minimal wire form, only meaningful for identified records.
    pub fn summary(&self) -> Option<RepositorySummary> {
        self.identifier.as_ref().map(|id| RepositorySummary {
            name: self.name.clone(),
            id: id.clone(),
        })
    }
}

/// Discovery result as serialized to clients: `{"name": ..., "id": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub name: String,
    pub id: String,
}

/// Source of repository records for one root store.
pub trait RepositoryCatalog: Send + Sync {
    /// Root store this catalog describes.
    fn root(&self) -> &Path;

    /// Backend used to recognize repositories.
    fn backend(&self) -> &dyn RepositoryBackend;

    /// Enumerate identified repositories directly under the root.
    fn scan<'a>(
        &'a self,
        progress: &'a dyn Progress,
    ) -> Result<Box<dyn Iterator<Item = RepositoryRecord> + 'a>>;

    /// First repository whose identifier equals `identifier`.
    fn find_by_identifier(
        &self,
        identifier: &str,
        progress: &dyn Progress,
    ) -> Result<Option<RepositoryRecord>> {
        Ok(self
            .scan(progress)?
            .find(|record| record.identifier.as_deref() == Some(identifier)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_serializes_name_and_id() {
        let record = RepositoryRecord {
            path: PathBuf::from("/store/alpha"),
            name: "alpha".into(),
            identifier: Some("123abc".into()),
        };
        let json = serde_json::to_value(record.summary().unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({"name": "alpha", "id": "123abc"}));
    }

    #[test]
    fn test_unidentified_record_has_no_summary() {
        let record = RepositoryRecord {
            path: PathBuf::from("/store/pending"),
            name: "pending".into(),
            identifier: None,
        };
        assert!(record.summary().is_none());
    }
}
