//! Transport-agnostic hub operations.
//!
//! Each function is one blocking unit of work over an explicit store handle.
//! `RepoHub` runs them on the blocking pool; tests and other hosts can call
//! them directly.

use crate::catalog::{RepositoryCatalog, RepositorySummary};
use crate::error::Result;
use crate::placement::{PlacementArbiter, PlacementRequest, PlacementResult};
use crate::progress::Progress;
use crate::query;

/// Scan the store and return the repositories matching `raw_query`.
///
/// Never mutates the store.
pub fn discover_repositories(
    catalog: &dyn RepositoryCatalog,
    raw_query: Option<&str>,
    progress: &dyn Progress,
) -> Result<Vec<RepositorySummary>> {
    progress.message("Client requested repository information.");
    let records = catalog.scan(progress)?;
    let matching = query::filter(records, raw_query, progress);
    Ok(matching.iter().filter_map(|r| r.summary()).collect())
}

/// Find or create the directory that receives an inbound repository.
pub fn prepare_placement(
    arbiter: &PlacementArbiter,
    request: &PlacementRequest,
    progress: &dyn Progress,
) -> Result<PlacementResult> {
    progress.message(&format!(
        "Client asked to receive {:?} (identifier {})",
        request.desired_name,
        request.identifier().unwrap_or("none")
    ));
    arbiter.place(request, progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MercurialStore, RepositoryBackend};
    use crate::catalog::DirectoryCatalog;
    use crate::progress::CapturedProgress;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_discover_on_empty_store() {
        let temp = TempDir::new().unwrap();
        let backend: Arc<dyn RepositoryBackend> = Arc::new(MercurialStore::new());
        let catalog = DirectoryCatalog::new(temp.path(), backend);
        let progress = CapturedProgress::new();

        let found = discover_repositories(&catalog, None, &progress).unwrap();
        assert!(found.is_empty());
        assert!(!progress.entries().is_empty());
    }

    #[test]
    fn test_prepare_placement_reports_request() {
        let temp = TempDir::new().unwrap();
        let backend: Arc<dyn RepositoryBackend> = Arc::new(MercurialStore::new());
        let arbiter = PlacementArbiter::new(Arc::new(DirectoryCatalog::new(temp.path(), backend)));
        let progress = CapturedProgress::new();

        let result = prepare_placement(&arbiter, &PlacementRequest::new("inbox", None), &progress)
            .unwrap();
        assert!(result.must_wait);
        assert!(progress
            .entries()
            .iter()
            .any(|(_, text)| text.contains("inbox")));
    }
}
