//! Installer descriptor (`installer.toml`).

use super::default_true;
use crate::bundler::error::{Error, Result};
use std::path::PathBuf;

/// Installation scope.
///
/// # Configuration
///
/// ```toml
/// scope = "user"  # or "machine"
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallScope {
    /// Per-user installation (no admin rights required).
    ///
    /// Installs under the user's program folder.
    #[default]
    User,

    /// Per-machine installation (requires admin rights).
    ///
    /// Installs to `%PROGRAMFILES%`.
    Machine,
}

/// Inno Setup compression algorithm.
///
/// | Algorithm | Speed | Size |
/// |-----------|-------|------|
/// | None | Fastest | Largest |
/// | Zip | Fast | Medium |
/// | Bzip | Medium | Small |
/// | Lzma | Slow | Smaller |
/// | Lzma2 | Slow | Smallest |
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InnoCompression {
    None,
    Zip,
    Bzip,
    Lzma,
    /// Default, best ratio.
    #[default]
    Lzma2,
}

/// Installer identity and behavior.
///
/// `identifier` must never change between releases: the installer's AppId is
/// derived from it, and a changed AppId makes Windows treat a new version as
/// a separate product instead of an upgrade.
///
/// # Configuration
///
/// ```toml
/// name = "Smart Class Planner"
/// version = "1.0.0"
/// publisher = "Smart Class Planner Team"
/// url = "https://example.edu/planner"
/// identifier = "edu.example.smart-class-planner"
/// scope = "user"
/// ```
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstallerSettings {
    /// Display name.
    pub name: String,

    /// Semantic version; stamped into the installer file name.
    pub version: String,

    /// Publisher/company name.
    #[serde(default)]
    pub publisher: Option<String>,

    /// Publisher and support URL.
    #[serde(default)]
    pub url: Option<String>,

    /// Stable reverse-DNS identifier the AppId is derived from.
    pub identifier: String,

    /// Explicit AppId GUID, for products that already shipped with one.
    ///
    /// Default: None (UUID v5 of `identifier`)
    #[serde(default)]
    pub app_id: Option<String>,

    /// Default: [`InstallScope::User`]
    #[serde(default)]
    pub scope: InstallScope,

    /// Let a per-user install switch to a machine-wide one (with elevation)
    /// from the installer's dialog.
    ///
    /// Default: true
    #[serde(default = "default_true")]
    pub allow_elevation: bool,

    /// Offer an (unchecked) desktop shortcut task.
    ///
    /// Default: true
    #[serde(default = "default_true")]
    pub desktop_shortcut: bool,

    /// Create a Start Menu group with the launcher and an uninstall entry.
    ///
    /// Default: true
    #[serde(default = "default_true")]
    pub start_menu: bool,

    /// Offer to start the application on the final page.
    ///
    /// Default: true
    #[serde(default = "default_true")]
    pub launch_after_install: bool,

    /// Installer icon (.ico), relative to the project directory.
    #[serde(default)]
    pub icon: Option<PathBuf>,

    /// License shown before installing.
    #[serde(default)]
    pub license_file: Option<PathBuf>,

    /// Directory the installer is written to.
    ///
    /// Default: `installer_output`
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Installer file name prefix.
    ///
    /// Default: `name` with whitespace removed
    #[serde(default)]
    pub output_base: Option<String>,

    /// Default: [`InnoCompression::Lzma2`]
    #[serde(default)]
    pub compression: InnoCompression,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("installer_output")
}

impl InstallerSettings {
    /// Creates a descriptor with defaults for everything but the identity.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            publisher: None,
            url: None,
            identifier: identifier.into(),
            app_id: None,
            scope: InstallScope::default(),
            allow_elevation: true,
            desktop_shortcut: true,
            start_menu: true,
            launch_after_install: true,
            icon: None,
            license_file: None,
            output_dir: default_output_dir(),
            output_base: None,
            compression: InnoCompression::default(),
        }
    }

    /// Parses `version` as a semantic version.
    pub fn semver(&self) -> Result<semver::Version> {
        semver::Version::parse(self.version.trim()).map_err(|error| Error::Version {
            version: self.version.clone(),
            error,
        })
    }

    /// Installer file name prefix.
    pub fn output_base(&self) -> String {
        match &self.output_base {
            Some(base) => base.clone(),
            None => self.name.split_whitespace().collect(),
        }
    }

    /// Installer file name without extension, e.g. `SmartClassPlanner-1.0.0-setup`.
    pub fn output_base_filename(&self) -> String {
        format!("{}-{}-setup", self.output_base(), self.version.trim())
    }

    /// Installer file name, e.g. `SmartClassPlanner-1.0.0-setup.exe`.
    pub fn output_file_name(&self) -> String {
        format!("{}.exe", self.output_base_filename())
    }
}
