//! Builder for constructing Settings.

use super::{BundleSettings, EnvironmentSettings, InstallerSettings, Settings};
use crate::bundler::error::{Context, ErrorExt, Result};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Builder for constructing [`Settings`].
///
/// # Examples
///
/// ```no_run
/// use planner_bundler::bundler::{BundleSettings, InstallerSettings, SettingsBuilder};
///
/// # fn example() -> planner_bundler::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .project_dir(".")
///     .bundle_settings(BundleSettings::new("SmartClassPlanner", "smart_class_planner/main.py"))
///     .installer_settings(InstallerSettings::new(
///         "Smart Class Planner",
///         "1.0.0",
///         "edu.example.smart-class-planner",
///     ))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    project_dir: Option<PathBuf>,
    environment: EnvironmentSettings,
    bundle: Option<BundleSettings>,
    installer: Option<InstallerSettings>,
}

impl SettingsBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the project directory (required). Relative paths are resolved
    /// against the current directory.
    pub fn project_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.project_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Default: [`EnvironmentSettings::default`]
    pub fn environment_settings(mut self, settings: EnvironmentSettings) -> Self {
        self.environment = settings;
        self
    }

    /// Sets the bundle manifest (required).
    pub fn bundle_settings(mut self, settings: BundleSettings) -> Self {
        self.bundle = Some(settings);
        self
    }

    /// Sets the installer descriptor (required).
    pub fn installer_settings(mut self, settings: InstallerSettings) -> Self {
        self.installer = Some(settings);
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if a required part is missing, the bundle name is
    /// empty, or the installer version is not a semantic version.
    pub fn build(self) -> Result<Settings> {
        let project_dir = self.project_dir.context("project_dir is required")?;
        let project_dir = project_dir
            .absolutize()
            .fs_context("resolving project directory", &project_dir)?
            .into_owned();

        let bundle = self.bundle.context("bundle settings are required")?;
        if bundle.name.trim().is_empty() {
            crate::bail!("bundle name must not be empty");
        }
        if !is_plain_file_name(&bundle.name) {
            crate::bail!(
                "bundle name `{}` must be a plain file name without path separators",
                bundle.name
            );
        }

        let installer = self.installer.context("installer settings are required")?;
        installer.semver()?;
        if let Some(base) = installer
            .output_base
            .as_deref()
            .filter(|base| !is_plain_file_name(base))
        {
            crate::bail!(
                "installer output_base `{}` must be a plain file name without path separators",
                base
            );
        }

        Ok(Settings::new(project_dir, self.environment, bundle, installer))
    }
}

/// The name becomes a directory and file name under `dist/` and `build/`.
fn is_plain_file_name(name: &str) -> bool {
    let name = name.trim();
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', ':'])
}
