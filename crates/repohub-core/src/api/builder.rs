//! Builder for configuring RepoHub initialization.

use std::path::PathBuf;
use std::sync::Arc;

use crate::api::state::HubState;
use crate::backend::{BackendKind, RepositoryBackend};
use crate::catalog::{DirectoryCatalog, RepositoryCatalog};
use crate::error::{HubError, Result};
use crate::placement::PlacementArbiter;
use crate::progress::{Progress, TracingProgress};
use crate::RepoHub;

/// Builder for configuring RepoHub initialization.
///
/// # Example
///
/// ```rust,ignore
/// use repohub_core::{BackendKind, RepoHub};
///
/// let hub = RepoHub::builder("/srv/hub")
///     .auto_create_root(true)
///     .backend(BackendKind::Native)
///     .build()?;
/// ```
pub struct RepoHubBuilder {
    root: PathBuf,
    auto_create_root: bool,
    backend: Option<Arc<dyn RepositoryBackend>>,
    backend_kind: BackendKind,
    progress: Option<Arc<dyn Progress>>,
}

impl RepoHubBuilder {
    /// Create a new builder for the given root store.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            auto_create_root: false,
            backend: None,
            backend_kind: BackendKind::default(),
            progress: None,
        }
    }

    /// Create the root store directory if it doesn't exist.
    ///
    /// Default: `false` (the root must exist)
    pub fn auto_create_root(mut self, enable: bool) -> Self {
        self.auto_create_root = enable;
        self
    }

    /// Select a built-in backend.
    ///
    /// Default: [`BackendKind::Native`]
    pub fn backend(mut self, kind: BackendKind) -> Self {
        self.backend_kind = kind;
        self
    }

    /// Use a custom backend implementation. Takes precedence over
    /// [`RepoHubBuilder::backend`].
    pub fn backend_impl(mut self, backend: Arc<dyn RepositoryBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Sink for operation diagnostics.
    ///
    /// Default: [`TracingProgress`]
    pub fn progress(mut self, progress: Arc<dyn Progress>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Build the RepoHub instance.
    pub fn build(self) -> Result<RepoHub> {
        if !self.root.exists() {
            if !self.auto_create_root {
                return Err(HubError::Config {
                    message: format!("Root store does not exist: {}", self.root.display()),
                });
            }
            std::fs::create_dir_all(&self.root).map_err(|e| HubError::Io {
                message: format!("Failed to create root store: {}", self.root.display()),
                path: Some(self.root.clone()),
                source: Some(e),
            })?;
        } else if !self.root.is_dir() {
            return Err(HubError::Config {
                message: format!("Root store is not a directory: {}", self.root.display()),
            });
        }

        let backend: Arc<dyn RepositoryBackend> = match self.backend {
            Some(backend) => backend,
            None => Arc::from(self.backend_kind.build()),
        };
        let catalog: Arc<dyn RepositoryCatalog> =
            Arc::new(DirectoryCatalog::new(self.root.clone(), backend));
        let arbiter = PlacementArbiter::new(Arc::clone(&catalog));
        let progress = self
            .progress
            .unwrap_or_else(|| Arc::new(TracingProgress));

        tracing::info!(
            "Serving repositories from {} ({} backend)",
            self.root.display(),
            catalog.backend().name()
        );

        Ok(RepoHub {
            inner: Arc::new(HubState {
                root: self.root,
                catalog,
                arbiter,
                progress,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_root_is_config_error() {
        let temp = TempDir::new().unwrap();
        let result = RepoHubBuilder::new(temp.path().join("absent")).build();
        assert!(matches!(result, Err(HubError::Config { .. })));
    }

    #[test]
    fn test_auto_create_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("nested").join("store");
        let hub = RepoHubBuilder::new(&root)
            .auto_create_root(true)
            .build()
            .unwrap();
        assert!(root.is_dir());
        assert_eq!(hub.root(), root.as_path());
    }

    #[test]
    fn test_file_root_is_rejected() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("store");
        std::fs::write(&file, "").unwrap();
        let result = RepoHubBuilder::new(&file).auto_create_root(true).build();
        assert!(matches!(result, Err(HubError::Config { .. })));
    }

    #[test]
    fn test_backend_selection() {
        let temp = TempDir::new().unwrap();
        let hub = RepoHubBuilder::new(temp.path())
            .backend(BackendKind::Command {
                program: PathBuf::from("hg"),
            })
            .build()
            .unwrap();
        assert_eq!(hub.status().backend, "hg");
    }
}
