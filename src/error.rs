//! Error types for gmachine
//!
//! Uses `thiserror` for library errors; the binary wraps these in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for gmachine operations
pub type GmachineResult<T> = Result<T, GmachineError>;

/// Main error type for gmachine operations
#[derive(Error, Debug)]
pub enum GmachineError {
    /// Machine name absent from the registry
    #[error("machine '{name}' does not exist")]
    NotFound { name: String },

    /// Duplicate add
    #[error("machine '{name}' already exists")]
    AlreadyExists { name: String },

    /// Registry file exists but is not writable
    #[error("registry file {path} is not writable")]
    Permission { path: PathBuf },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// External provider tool exited unsuccessfully
    #[error("gcloud: {message}")]
    Provider { message: String },

    /// Per-machine describe failure; non-fatal during status aggregation
    #[error("describe '{name}' failed: {message}")]
    Describe { name: String, message: String },

    /// Internal failure of the status aggregation itself; fatal
    #[error("status aggregation failed: {message}")]
    Aggregation { message: String },

    /// No machine name given and no default is set
    #[error("must specify machine or set a default machine with 'set-default'")]
    NoMachineSelected,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_error_display_not_found() {
        let err = GmachineError::NotFound {
            name: "machine2".to_string(),
        };
        assert_eq!(err.to_string(), "machine 'machine2' does not exist");
    }

    #[test]
    fn test_error_display_permission() {
        let err = GmachineError::Permission {
            path: PathBuf::from("/etc/gmachine.yaml"),
        };
        assert_eq!(
            err.to_string(),
            "registry file /etc/gmachine.yaml is not writable"
        );
    }

    #[test]
    fn test_error_display_describe() {
        let err = GmachineError::Describe {
            name: "dev1".to_string(),
            message: "instance not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "describe 'dev1' failed: instance not found"
        );
    }
}
