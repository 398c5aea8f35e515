//! Error types for the repository hub.
//!
//! Collisions during placement are never errors; everything here is either a
//! lookup failure, a bad request, or a backend/filesystem fault that is fatal
//! for the one call that hit it.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the hub library.
#[derive(Debug, Error)]
pub enum HubError {
    // Store errors
    #[error("Root store unavailable at {path}: {message}")]
    Lookup {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // Placement errors
    #[error("Invalid repository directory name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Failed to acquire placement lock at {path}: {message}")]
    Lock { path: PathBuf, message: String },

    // Backend errors
    #[error("Repository backend failed at {path}: {message}")]
    Backend { path: PathBuf, message: String },

    // Request errors
    #[error("Invalid params: {message}")]
    InvalidParams { message: String },

    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("{0}")]
    Other(String),
}

/// Result type alias for hub operations.
pub type Result<T> = std::result::Result<T, HubError>;

impl From<std::io::Error> for HubError {
    fn from(err: std::io::Error) -> Self {
        HubError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for HubError {
    fn from(err: serde_json::Error) -> Self {
        HubError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl HubError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        HubError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Create a lookup error for a root store that cannot be listed.
    pub fn lookup(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        HubError::Lookup {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a backend error.
    pub fn backend(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        HubError::Backend {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Convert to a JSON-RPC error code.
    ///
    /// Standard JSON-RPC error codes:
    /// - -32602: Invalid params
    /// - -32603: Internal error
    ///
    /// Custom error codes (application-defined, -32000 to -32099):
    /// - -32001: Root store lookup failed
    /// - -32002: Invalid repository directory name
    /// - -32003: Repository backend failure
    /// - -32004: Placement lock unavailable
    pub fn to_rpc_error_code(&self) -> i32 {
        match self {
            HubError::Lookup { .. } => -32001,
            HubError::InvalidName { .. } => -32002,
            HubError::Backend { .. } => -32003,
            HubError::Lock { .. } => -32004,
            HubError::InvalidParams { .. } => -32602,

            // All other errors are internal errors
            _ => -32603,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HubError::InvalidName {
            name: "..".into(),
            reason: "must be a plain directory name".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid repository directory name \"..\": must be a plain directory name"
        );
    }

    #[test]
    fn test_rpc_error_codes() {
        let lookup = HubError::lookup(
            std::io::Error::from(std::io::ErrorKind::NotFound),
            "/missing",
        );
        assert_eq!(lookup.to_rpc_error_code(), -32001);
        assert_eq!(
            HubError::backend("/store/foo", "disk full").to_rpc_error_code(),
            -32003
        );
        assert_eq!(
            HubError::InvalidParams {
                message: "missing".into()
            }
            .to_rpc_error_code(),
            -32602
        );
        assert_eq!(HubError::Other("boom".into()).to_rpc_error_code(), -32603);
    }

    #[test]
    fn test_io_conversion_keeps_source() {
        let err: HubError = std::io::Error::from(std::io::ErrorKind::PermissionDenied).into();
        assert!(matches!(err, HubError::Io { path: None, source: Some(_), .. }));
    }
}
