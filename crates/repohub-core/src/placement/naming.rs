//! Directory names for placements.

use crate::config::{case_insensitive_filesystem, PlacementConfig};
use crate::error::{HubError, Result};
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Check that `name` is a single plain directory name under the root.
pub fn validate_directory_name(name: &str) -> Result<&str> {
    let invalid = |reason: &str| HubError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("name is empty"));
    }
    if name.contains(['/', '\\', '\0']) {
        return Err(invalid("name contains a path separator or NUL"));
    }
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => {}
        _ => return Err(invalid("must be a plain directory name")),
    }
    if name == PlacementConfig::LOCK_FILE_NAME {
        return Err(invalid("name is reserved"));
    }
    Ok(name)
}

fn comparison_key(name: &str) -> String {
    if case_insensitive_filesystem() {
        name.to_lowercase()
    } else {
        name.to_string()
    }
}

/// Entries of `root` named `<base><n>` for some `n >= 1`, ordered by `n`.
pub(crate) fn numbered_siblings(root: &Path, base: &str) -> Result<Vec<PathBuf>> {
    let prefix = comparison_key(base);
    let mut found: Vec<(usize, PathBuf)> = fs::read_dir(root)
        .map_err(|e| HubError::lookup(e, root))?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let key = comparison_key(entry.file_name().to_str()?);
            let digits = key.strip_prefix(&prefix)?;
            if digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let n = digits.parse::<usize>().ok()?;
            Some((n, entry.path()))
        })
        .collect();
    found.sort_by_key(|(n, _)| *n);
    Ok(found.into_iter().map(|(_, path)| path).collect())
}

/// Pick `<base><n>` with the smallest `n >= 1` that names no entry of `root`.
///
/// Every current entry is listed first, so the result cannot collide with
/// anything present when this runs. Callers hold the placement lock to keep
/// it that way until the name is used.
pub fn unique_sibling_name(root: &Path, base: &str) -> Result<PathBuf> {
    let taken: HashSet<String> = fs::read_dir(root)
        .map_err(|e| HubError::lookup(e, root))?
        .filter_map(|entry| entry.ok())
        .map(|entry| comparison_key(&entry.file_name().to_string_lossy()))
        .collect();

    for n in 1..=PlacementConfig::MAX_SIBLING_SUFFIX {
        let candidate = format!("{}{}", base, n);
        if taken.contains(&comparison_key(&candidate)) {
            continue;
        }
        let path = root.join(&candidate);
        match fs::symlink_metadata(&path) {
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(path),
            Err(e) => return Err(HubError::io_with_path(e, path)),
            Ok(_) => continue,
        }
    }

    Err(HubError::Other(format!(
        "No free sibling name for {} under {}",
        base,
        root.display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_numbered_siblings_are_ordered_by_suffix() {
        let temp = TempDir::new().unwrap();
        for name in ["foo", "foo10", "foo2", "foo02", "foobar", "foo1x", "bar1"] {
            fs::create_dir(temp.path().join(name)).unwrap();
        }

        let found = numbered_siblings(temp.path(), "foo").unwrap();
        assert_eq!(
            found,
            vec![temp.path().join("foo2"), temp.path().join("foo10")]
        );
    }

    #[test]
    fn test_validate_accepts_plain_names() {
        assert_eq!(validate_directory_name("foo").unwrap(), "foo");
        assert_eq!(validate_directory_name("My Project 2").unwrap(), "My Project 2");
        assert!(validate_directory_name(".hidden").is_ok());
    }

    #[test]
    fn test_validate_rejects_traversal_and_separators() {
        for name in ["", ".", "..", "a/b", "a\\b", "/abs", "nul\0byte"] {
            assert!(
                matches!(validate_directory_name(name), Err(HubError::InvalidName { .. })),
                "{:?} should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_validate_rejects_lock_file_name() {
        assert!(validate_directory_name(PlacementConfig::LOCK_FILE_NAME).is_err());
    }

    #[test]
    fn test_unique_sibling_skips_taken_entries() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("foo")).unwrap();
        fs::create_dir(temp.path().join("foo1")).unwrap();
        fs::write(temp.path().join("foo2"), "a file still takes the name").unwrap();

        let path = unique_sibling_name(temp.path(), "foo").unwrap();
        assert_eq!(path, temp.path().join("foo3"));
    }

    #[test]
    fn test_unique_sibling_in_empty_root() {
        let temp = TempDir::new().unwrap();
        assert_eq!(
            unique_sibling_name(temp.path(), "foo").unwrap(),
            temp.path().join("foo1")
        );
    }

    #[test]
    fn test_unique_sibling_missing_root() {
        let temp = TempDir::new().unwrap();
        let result = unique_sibling_name(&temp.path().join("gone"), "foo");
        assert!(matches!(result, Err(HubError::Lookup { .. })));
    }
}
