//! Placement of inbound repository clones.
//!
//! Placement is a find-or-create keyed by repository identity. The desired
//! directory name only matters the first time a repository arrives, and for
//! humans browsing the store.

mod arbiter;
mod lock;
mod naming;

pub use arbiter::PlacementArbiter;
pub use lock::PlacementLock;
pub use naming::{unique_sibling_name, validate_directory_name};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where a client would like its repository to go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementRequest {
    pub desired_name: String,
    #[serde(default)]
    pub identifier: Option<String>,
}

impl PlacementRequest {
    pub fn new(desired_name: impl Into<String>, identifier: Option<String>) -> Self {
        Self {
            desired_name: desired_name.into(),
            identifier,
        }
    }

    /// The identifier, with an empty string treated as absent.
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref().filter(|id| !id.is_empty())
    }
}

/// Which branch of the placement policy produced a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlacementOutcome {
    /// A repository with the requested identifier already exists.
    ReusedIdentity,
    /// The desired directory holds a repository that does not conflict.
    ReusedExisting,
    /// The desired directory did not exist and was created.
    Created,
    /// The desired directory existed empty and was initialized in place.
    InitializedEmpty,
    /// Foreign content was moved aside to make room.
    ReplacedForeign { displaced_to: PathBuf },
    /// The desired directory holds a different repository; a sibling was used.
    CreatedSibling,
    /// A sibling from an earlier conflicting placement, still without
    /// content, was handed out again.
    ReusedPendingSibling,
}

/// Directory chosen for an inbound repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementResult {
    pub path: PathBuf,
    /// True when the directory was just initialized empty and the content
    /// still has to arrive out of band.
    pub must_wait: bool,
    pub outcome: PlacementOutcome,
}

impl PlacementResult {
    pub(crate) fn reused(path: PathBuf, outcome: PlacementOutcome) -> Self {
        Self {
            path,
            must_wait: false,
            outcome,
        }
    }

    pub(crate) fn initialized(path: PathBuf, outcome: PlacementOutcome) -> Self {
        Self {
            path,
            must_wait: true,
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_identifier_is_absent() {
        assert_eq!(PlacementRequest::new("foo", Some(String::new())).identifier(), None);
        assert_eq!(
            PlacementRequest::new("foo", Some("abc".into())).identifier(),
            Some("abc")
        );
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = PlacementOutcome::ReplacedForeign {
            displaced_to: PathBuf::from("/store/foo1"),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["kind"], "replaced_foreign");
        assert_eq!(json["displaced_to"], "/store/foo1");
    }
}
