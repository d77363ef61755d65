//! Error types for Goca operations.
//!
//! This module defines the canonical error type used throughout Goca.
//! All subsystems return `Result<T, GocaError>` for error handling, and the
//! binary maps each variant to a stable process exit code.

use std::io;
use thiserror::Error;

/// Canonical error type for all Goca operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
#[derive(Error, Debug)]
pub enum GocaError {
    /// User input rejected before any side effect (malformed fields,
    /// unknown dialect, empty feature name, bad naming token).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// `.goca.yaml` failed to parse or validate. Carries every offending
    /// path so a single run reports the complete set of problems.
    #[error("Configuration error:\n{}", .0.join("\n"))]
    Configuration(Vec<String>),

    /// I/O error (auto-converts from `std::io::Error`)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An existing file could not be integrated (missing package clause,
    /// unrecognizable import region). The file is left untouched.
    #[error("Cannot integrate {path}: {reason}")]
    Integration { path: String, reason: String },

    /// A file already exists and overwriting was refused. Reserved for
    /// strict mode; the default policy warns and overwrites.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Invariant violated inside the generator.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GocaError {
    /// Process exit code for this error kind.
    ///
    /// 1 = configuration, 2 = argument/validation, 3 = file I/O and
    /// integration failures.
    pub fn exit_code(&self) -> i32 {
        match self {
            GocaError::Configuration(_) => 1,
            GocaError::InvalidArgument(_) | GocaError::Conflict(_) | GocaError::Internal(_) => 2,
            GocaError::Io(_) | GocaError::Integration { .. } => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_display() {
        let err = GocaError::InvalidArgument("field name '9x' is not a valid identifier".to_string());
        assert_eq!(
            format!("{}", err),
            "Invalid argument: field name '9x' is not a valid identifier"
        );
    }

    #[test]
    fn test_configuration_error_lists_all_paths() {
        let err = GocaError::Configuration(vec![
            "database.type: unknown dialect 'oracle'".to_string(),
            "features.auth.type: unknown auth type 'basic'".to_string(),
        ]);
        let rendered = format!("{}", err);
        assert!(rendered.contains("database.type"));
        assert!(rendered.contains("features.auth.type"));
    }

    #[test]
    fn test_integration_error_display() {
        let err = GocaError::Integration {
            path: "cmd/server/main.go".to_string(),
            reason: "no package declaration".to_string(),
        };
        assert_eq!(
            format!("{}", err),
            "Cannot integrate cmd/server/main.go: no package declaration"
        );
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(GocaError::Configuration(vec![]).exit_code(), 1);
        assert_eq!(GocaError::InvalidArgument("x".into()).exit_code(), 2);
        assert_eq!(
            GocaError::Io(io::Error::new(io::ErrorKind::NotFound, "gone")).exit_code(),
            3
        );
    }
}
