//! Centralized configuration for the repository hub.
//!
//! This module provides the on-disk layout constants of the Mercurial store,
//! query keys, placement naming and server defaults.

/// Mercurial on-disk layout consumed by the hub.
pub struct HgLayout;

impl HgLayout {
    /// Hidden metadata directory that marks a repository.
    pub const METADATA_DIR: &'static str = ".hg";
    pub const STORE_DIR: &'static str = "store";
    /// Content-index directory below the store.
    pub const DATA_DIR: &'static str = "data";
    /// Suffix appended to every revlog index filename.
    pub const INDEX_SUFFIX: &'static str = ".i";
    pub const CHANGELOG_INDEX: &'static str = "00changelog.i";
    pub const REQUIRES_FILE: &'static str = "requires";
    /// Requirements written for a freshly initialized repository.
    pub const DEFAULT_REQUIREMENTS: &'static [&'static str] =
        &["dotencode", "fncache", "generaldelta", "revlogv1", "store"];
    /// Requirement that places revlogs under `.hg/store`.
    pub const STORE_REQUIREMENT: &'static str = "store";
    /// Size of one revlog v1 index entry.
    pub const INDEX_ENTRY_SIZE: usize = 64;
    /// Byte range of the node id inside an index entry.
    pub const NODE_OFFSET: usize = 32;
    pub const NODE_LENGTH: usize = 20;
    /// Contents of `.hg/00changelog.i` in a store repository; keeps
    /// pre-store clients from misreading the layout.
    pub const LEGACY_CHANGELOG_GUARD: &'static [u8] =
        b"\0\0\0\x02 dummy changelog to prevent using the old repo layout";
}

/// Query string handling.
pub struct QueryConfig;

impl QueryConfig {
    /// The only recognized query key.
    pub const FILE_PATTERN_KEY: &'static str = "filePattern";
    /// Separator between alternative patterns.
    pub const OR_CHAR: char = '|';
    /// Base that relative queries such as `?filePattern=*.lift` resolve against.
    pub const RELATIVE_BASE: &'static str = "http://localhost/";
}

/// Placement arbitration.
pub struct PlacementConfig;

impl PlacementConfig {
    /// Advisory lock file held while a placement mutates the root store.
    pub const LOCK_FILE_NAME: &'static str = ".repohub.lock";
    /// Upper bound on unique sibling name probing.
    pub const MAX_SIBLING_SUFFIX: u32 = 100_000;
}

/// JSON-RPC server defaults.
pub struct ServerConfig;

impl ServerConfig {
    pub const DEFAULT_HOST: &'static str = "0.0.0.0";
    pub const DEFAULT_PORT: u16 = 5913;
    pub const MAX_CONCURRENT_REQUESTS: usize = 64;
}

/// Whether filenames on this host compare case-insensitively.
///
/// Follows the default filesystem of each platform: NTFS and APFS are
/// case-insensitive, everything else is treated as case-sensitive.
pub const fn case_insensitive_filesystem() -> bool {
    cfg!(any(target_os = "windows", target_os = "macos"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_range_fits_entry() {
        assert!(HgLayout::NODE_OFFSET + HgLayout::NODE_LENGTH <= HgLayout::INDEX_ENTRY_SIZE);
    }

    #[test]
    fn test_default_requirements_include_store() {
        assert!(HgLayout::DEFAULT_REQUIREMENTS.contains(&HgLayout::STORE_REQUIREMENT));
    }

    #[test]
    fn test_lock_file_is_hidden() {
        assert!(PlacementConfig::LOCK_FILE_NAME.starts_with('.'));
    }
}
