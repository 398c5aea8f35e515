//! Shared state behind a `RepoHub` handle.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

use crate::catalog::RepositoryCatalog;
use crate::placement::PlacementArbiter;
use crate::progress::Progress;

/// Everything one hub owns. Wrapped in `Arc` so clones of `RepoHub` and the
/// blocking worker closures share it.
pub(crate) struct HubState {
    pub(crate) root: PathBuf,
    pub(crate) catalog: Arc<dyn RepositoryCatalog>,
    pub(crate) arbiter: PlacementArbiter,
    pub(crate) progress: Arc<dyn Progress>,
}

/// Snapshot reported by `get_status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubStatus {
    pub version: String,
    pub root: PathBuf,
    pub backend: String,
    /// Whether the root store is currently reachable.
    pub root_available: bool,
}
