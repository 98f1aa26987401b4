//! Packaging stages for the Smart Class Planner desktop application.
//!
//! The pipeline has three strictly sequential stages, each consuming the
//! previous stage's output:
//!
//! 1. [`environment`] - create or reuse the isolated Python environment and
//!    install the dependency manifest plus PyInstaller into it.
//! 2. [`freeze`] - render a PyInstaller spec from the bundle manifest and
//!    produce a one-folder bundle with a native launcher.
//! 3. [`installer`] - wrap the bundle into an Inno Setup installer, if the
//!    Inno Setup compiler can be found.
//!
//! [`Pipeline`] ties them together; the CLI narrates the stage boundaries.

pub mod builder;
pub mod environment;
pub mod error;
pub mod freeze;
pub mod installer;
pub mod settings;
pub mod utils;

use serde::Serialize;
use std::path::PathBuf;

pub use builder::{Pipeline, PipelineReport, RunStatus, Stage};
pub use error::{Error, Result};
pub use installer::InstallerOutcome;
pub use settings::{
    BundleSettings, DataFile, EnvironmentSettings, InnoCompression, InstallScope,
    InstallerSettings, Settings, SettingsBuilder,
};

/// What kind of file system object an artifact is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    /// The bundled application directory containing the launcher.
    AppDirectory,
    /// The single-file installer executable.
    Installer,
}

/// A produced artifact with its size and checksum.
#[derive(Debug, Clone, Serialize)]
pub struct BundledArtifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    /// Total size in bytes (sum of all files for directories).
    pub size: u64,
    /// Hex-encoded SHA-256.
    pub checksum: String,
}
