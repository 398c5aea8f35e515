//! Backend that delegates to an installed `hg` executable.

use super::{metadata_dir, MercurialStore, RepositoryBackend};
use crate::error::{HubError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::debug;

/// Revset selecting the root changeset; empty (not an error) on a fresh repository.
const ROOT_REVSET: &str = "min(all())";

/// Runs `hg` for identification and initialization.
#[derive(Debug, Clone)]
pub struct HgCommand {
    program: PathBuf,
}

impl HgCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Path of the executable this backend runs.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Whether the executable can be started at all.
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false)
    }

    fn run(&self, dir: &Path, args: &[&str]) -> Result<Output> {
        debug!("Running {} {:?} for {}", self.program.display(), args, dir.display());
        let output = Command::new(&self.program)
            .args(args)
            .env("HGPLAIN", "1")
            .output()
            .map_err(|e| {
                HubError::backend(dir, format!("failed to run {}: {}", self.program.display(), e))
            })?;

        if !output.status.success() {
            return Err(HubError::backend(
                dir,
                format!(
                    "{} exited with {}: {}",
                    self.program.display(),
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }
        Ok(output)
    }
}

impl RepositoryBackend for HgCommand {
    fn name(&self) -> &'static str {
        "hg"
    }

    fn identifier(&self, dir: &Path) -> Result<Option<String>> {
        if !self.is_repository(dir) {
            return Ok(None);
        }
        let repo = dir.to_string_lossy().into_owned();
        let output = self.run(
            dir,
            &["log", "-R", repo.as_str(), "-r", ROOT_REVSET, "--template", "{node}"],
        )?;
        let node = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(if node.is_empty() { None } else { Some(node) })
    }

    fn init(&self, dir: &Path) -> Result<()> {
        if metadata_dir(dir).exists() {
            // `hg init` refuses an existing .hg; finish whatever is there instead.
            return MercurialStore::new().init(dir);
        }
        let repo = dir.to_string_lossy().into_owned();
        self.run(dir, &["init", repo.as_str()])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_program_is_unavailable() {
        let backend = HgCommand::new("/nonexistent/bin/hg-missing");
        assert!(!backend.is_available());

        let temp = TempDir::new().unwrap();
        let err = backend.init(temp.path()).unwrap_err();
        assert!(matches!(err, HubError::Backend { .. }));
    }

    #[test]
    fn test_plain_directory_has_no_identifier() {
        let temp = TempDir::new().unwrap();
        let backend = HgCommand::new("hg");
        assert_eq!(backend.identifier(temp.path()).unwrap(), None);
    }

    #[test]
    fn test_existing_metadata_is_completed_without_running_hg() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join(".hg")).unwrap();

        HgCommand::new("/nonexistent/bin/hg-missing")
            .init(temp.path())
            .unwrap();
        assert!(temp.path().join(".hg/requires").is_file());
    }

    #[test]
    fn test_init_and_identify_with_real_hg() {
        let backend = HgCommand::new("hg");
        if !backend.is_available() {
            return;
        }
        let temp = TempDir::new().unwrap();
        backend.init(temp.path()).unwrap();
        assert!(backend.is_repository(temp.path()));
        assert_eq!(backend.identifier(temp.path()).unwrap(), None);
    }
}
