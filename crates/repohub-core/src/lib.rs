//! RepoHub Core - Headless library for a shared Mercurial repository store.
//!
//! A root store is a plain directory whose immediate subdirectories are
//! repositories. Clients discover repositories by identifier, optionally
//! filtered by the files they track, and ask the hub to prepare a directory
//! before pushing a clone into it. This crate has no HTTP/RPC layer; see
//! `repohub-rpc` for the JSON-RPC server.
//!
//! # Example
//!
//! ```rust,ignore
//! use repohub_core::RepoHub;
//!
//! #[tokio::main]
//! async fn main() -> repohub_core::Result<()> {
//!     let hub = RepoHub::new("/srv/hub")?;
//!
//!     // Repositories that track a .lift file
//!     let found = hub.query(Some("?filePattern=*.lift")).await?;
//!     println!("Found {} repositories", found.len());
//!
//!     // Make room for a new clone
//!     let must_wait = hub.place(None, "dictionary").await?;
//!     println!("Wait for push: {}", must_wait);
//!
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod catalog;
pub mod config;
pub mod error;
pub mod placement;
pub mod progress;
pub mod query;

mod api;

// Re-export commonly used types
pub use api::{discover_repositories, prepare_placement, HubStatus, RepoHubBuilder};
pub use backend::{BackendKind, HgCommand, MercurialStore, RepositoryBackend};
pub use catalog::{DirectoryCatalog, RepositoryCatalog, RepositoryRecord, RepositorySummary};
pub use error::{HubError, Result};
pub use placement::{PlacementArbiter, PlacementOutcome, PlacementRequest, PlacementResult};
pub use progress::{CapturedProgress, Progress, ProgressLevel, TracingProgress};
pub use query::FileFilter;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use api::HubState;

/// Main entry point for hub operations.
///
/// Cheap to clone; clones share the same root store, backend and placement
/// serialization. Filesystem work runs on tokio's blocking pool, so the async
/// methods must be called from within a tokio runtime.
#[derive(Clone)]
pub struct RepoHub {
    inner: Arc<HubState>,
}

impl RepoHub {
    /// Create a builder for configuring a hub over `root`.
    pub fn builder(root: impl Into<PathBuf>) -> RepoHubBuilder {
        RepoHubBuilder::new(root)
    }

    /// Create a hub over an existing root store with the native backend.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        Self::builder(root).build()
    }

    /// Root store served by this hub.
    pub fn root(&self) -> &Path {
        &self.inner.root
    }

    /// Name of the active backend (`native` or `hg`).
    pub fn backend_name(&self) -> &'static str {
        self.inner.catalog.backend().name()
    }
}

impl std::fmt::Debug for RepoHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepoHub")
            .field("root", &self.inner.root)
            .field("backend", &self.backend_name())
            .finish()
    }
}
