//! Packaging pipeline for the Smart Class Planner desktop application.
//!
//! Turns the Python source tree into a standalone one-folder bundle with
//! PyInstaller and wraps it into an Inno Setup installer:
//! - environment preparation (isolated interpreter plus dependencies)
//! - application bundling (`dist/<name>/<name>[.exe]`)
//! - installer creation (`<output_dir>/<name>-<version>-setup.exe`)
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;
pub mod metadata;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
