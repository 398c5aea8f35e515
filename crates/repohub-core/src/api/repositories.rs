//! Repository discovery and placement methods.

use crate::api::operations;
use crate::api::state::HubStatus;
use crate::catalog::{RepositoryRecord, RepositorySummary};
use crate::error::{HubError, Result};
use crate::placement::{PlacementRequest, PlacementResult};
use crate::RepoHub;

impl RepoHub {
    /// Repositories whose content matches `raw_query`.
    ///
    /// `raw_query` is a URL-style string such as
    /// `http://hub/repos?filePattern=*.lift|*.txt`; a relative form like
    /// `?filePattern=*.lift` is accepted too.
    /// `None`, a query without `filePattern`, or an unparsable query all
    /// return every identified repository.
    pub async fn query(&self, raw_query: Option<&str>) -> Result<Vec<RepositorySummary>> {
        let state = self.inner.clone();
        let raw_query = raw_query.map(str::to_owned);
        run_blocking(move || {
            operations::discover_repositories(
                state.catalog.as_ref(),
                raw_query.as_deref(),
                state.progress.as_ref(),
            )
        })
        .await
    }

    /// Prepare a directory for an inbound repository.
    ///
    /// Returns `true` when the caller must wait for content to be pushed into
    /// a freshly initialized directory, `false` when an existing repository
    /// was reused.
    pub async fn place(&self, identifier: Option<&str>, desired_name: &str) -> Result<bool> {
        let request = PlacementRequest::new(desired_name, identifier.map(str::to_owned));
        Ok(self.place_detailed(request).await?.must_wait)
    }

    /// Like [`RepoHub::place`], but reports the chosen path and policy branch.
    pub async fn place_detailed(&self, request: PlacementRequest) -> Result<PlacementResult> {
        let state = self.inner.clone();
        run_blocking(move || {
            operations::prepare_placement(&state.arbiter, &request, state.progress.as_ref())
        })
        .await
    }

    /// Every identified repository in the root store, unfiltered.
    pub async fn list_repositories(&self) -> Result<Vec<RepositoryRecord>> {
        let state = self.inner.clone();
        run_blocking(move || Ok(state.catalog.scan(state.progress.as_ref())?.collect())).await
    }

    /// Version, root and backend of this hub.
    pub fn status(&self) -> HubStatus {
        HubStatus {
            version: env!("CARGO_PKG_VERSION").to_string(),
            root: self.inner.root.clone(),
            backend: self.inner.catalog.backend().name().to_string(),
            root_available: self.inner.root.is_dir(),
        }
    }
}

async fn run_blocking<T, F>(work: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| HubError::Other(format!("Blocking task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::PlacementOutcome;
    use crate::progress::CapturedProgress;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn hub(temp: &TempDir) -> RepoHub {
        RepoHub::builder(temp.path())
            .progress(Arc::new(CapturedProgress::new()))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_place_then_query() {
        let temp = TempDir::new().unwrap();
        let hub = hub(&temp);

        assert!(hub.place(None, "fresh").await.unwrap());
        assert!(temp.path().join("fresh").join(".hg").is_dir());

        // No content yet, so discovery skips it.
        assert!(hub.query(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_place_detailed_reports_outcome() {
        let temp = TempDir::new().unwrap();
        let hub = hub(&temp);

        let result = hub
            .place_detailed(PlacementRequest::new("fresh", None))
            .await
            .unwrap();
        assert_eq!(result.outcome, PlacementOutcome::Created);
        assert_eq!(result.path, temp.path().join("fresh"));
    }

    #[tokio::test]
    async fn test_query_fails_when_root_disappears() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("store");
        std::fs::create_dir(&root).unwrap();
        let hub = RepoHub::new(&root).unwrap();

        std::fs::remove_dir(&root).unwrap();
        let result = hub.query(None).await;
        assert!(matches!(result, Err(HubError::Lookup { .. })));
        assert!(!hub.status().root_available);
    }

    #[test]
    fn test_status() {
        let temp = TempDir::new().unwrap();
        let status = hub(&temp).status();
        assert_eq!(status.backend, "native");
        assert_eq!(status.root, temp.path());
        assert!(status.root_available);
    }
}
