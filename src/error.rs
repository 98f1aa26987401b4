//! Top-level error types for the CLI and configuration loading.
//!
//! Stage failures are [`crate::bundler::Error`]s; this layer adds
//! configuration problems on top.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Main error type for everything outside the stages themselves
#[derive(Error, Debug)]
pub enum BundlerError {
    /// CLI argument and configuration errors
    #[error("{0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bundler errors
    #[error("{0}")]
    Bundler(#[from] crate::bundler::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// A configuration file is missing or malformed
    #[error("Invalid configuration in {}: {reason}", path.display())]
    InvalidConfig {
        /// File that failed to load
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },
}

impl BundlerError {
    /// Actionable next steps for the operator
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            BundlerError::Cli(CliError::InvalidConfig { path, .. }) => vec![
                format!("Check {} against the documented keys", path.display()),
                "Run from the project directory or pass --project-dir".to_string(),
            ],
            BundlerError::Bundler(crate::bundler::Error::Version { .. }) => {
                vec!["Use a semantic version such as 1.0.0 in installer.toml".to_string()]
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_suggest_where_to_look() {
        let err = BundlerError::from(CliError::InvalidConfig {
            path: PathBuf::from("bundle.toml"),
            reason: "missing field `name`".into(),
        });
        assert_eq!(
            err.to_string(),
            "Invalid configuration in bundle.toml: missing field `name`"
        );
        assert!(err.recovery_suggestions()[0].contains("bundle.toml"));
    }
}
