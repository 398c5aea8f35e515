//! API implementation submodules.
//!
//! `repositories` holds the `impl RepoHub` block with the async entry points.
//! The struct definition remains in `lib.rs`.

mod builder;
mod operations;
mod repositories;
mod state;

pub use builder::RepoHubBuilder;
pub use operations::{discover_repositories, prepare_placement};
pub use state::HubStatus;
pub(crate) use state::HubState;
