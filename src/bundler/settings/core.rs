//! Core Settings struct and the fixed workspace layout.

use super::{BundleSettings, EnvironmentSettings, InstallerSettings};
use std::path::{Path, PathBuf};

/// Directory for bundler intermediates, deleted before every bundle.
pub const BUILD_DIR: &str = "build";
/// Directory the bundle is written to, deleted before every bundle.
pub const DIST_DIR: &str = "dist";
/// Per-stage subprocess logs, kept across the clean step.
pub const LOGS_DIR: &str = ".planner_bundler/logs";
/// Run summary written next to the bundle.
pub const REPORT_FILE: &str = "packaging-report.json";

/// Main settings for the packaging pipeline.
///
/// Constructed via [`SettingsBuilder`](super::SettingsBuilder). The project
/// directory is always absolute, so every derived path is too.
#[derive(Clone, Debug)]
pub struct Settings {
    project_dir: PathBuf,
    environment: EnvironmentSettings,
    bundle: BundleSettings,
    installer: InstallerSettings,
}

impl Settings {
    pub(super) fn new(
        project_dir: PathBuf,
        environment: EnvironmentSettings,
        bundle: BundleSettings,
        installer: InstallerSettings,
    ) -> Self {
        Self {
            project_dir,
            environment,
            bundle,
            installer,
        }
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn environment(&self) -> &EnvironmentSettings {
        &self.environment
    }

    pub fn bundle(&self) -> &BundleSettings {
        &self.bundle
    }

    pub fn installer(&self) -> &InstallerSettings {
        &self.installer
    }

    /// Resolves a configured path against the project directory.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_dir.join(path)
        }
    }

    pub fn requirements_path(&self) -> PathBuf {
        self.resolve(&self.environment.requirements)
    }

    pub fn venv_dir(&self) -> PathBuf {
        self.resolve(&self.environment.venv_dir)
    }

    pub fn entry_point_path(&self) -> PathBuf {
        self.resolve(&self.bundle.entry_point)
    }

    pub fn build_dir(&self) -> PathBuf {
        self.project_dir.join(BUILD_DIR)
    }

    pub fn dist_dir(&self) -> PathBuf {
        self.project_dir.join(DIST_DIR)
    }

    /// PyInstaller's work directory.
    pub fn work_dir(&self) -> PathBuf {
        self.build_dir().join("work")
    }

    /// Generated PyInstaller spec.
    pub fn spec_path(&self) -> PathBuf {
        self.build_dir().join(format!("{}.spec", self.bundle.name))
    }

    /// The bundled application directory.
    pub fn app_dir(&self) -> PathBuf {
        self.dist_dir().join(&self.bundle.name)
    }

    /// Launcher file name; PyInstaller appends `.exe` only on Windows.
    pub fn launcher_file_name(&self) -> String {
        if cfg!(target_os = "windows") {
            format!("{}.exe", self.bundle.name)
        } else {
            self.bundle.name.clone()
        }
    }

    /// Fixed launcher location whose existence signals a successful bundle.
    pub fn launcher_path(&self) -> PathBuf {
        self.app_dir().join(self.launcher_file_name())
    }

    /// Generated Inno Setup script.
    pub fn iss_path(&self) -> PathBuf {
        self.build_dir()
            .join("installer")
            .join(format!("{}.iss", self.installer.output_base()))
    }

    pub fn installer_output_dir(&self) -> PathBuf {
        self.resolve(&self.installer.output_dir)
    }

    /// Version-stamped installer location.
    pub fn installer_output_path(&self) -> PathBuf {
        self.installer_output_dir()
            .join(self.installer.output_file_name())
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.project_dir.join(LOGS_DIR)
    }

    /// Log file for one stage's subprocess output.
    pub fn log_path(&self, stage: &str) -> PathBuf {
        self.logs_dir().join(format!("{stage}.log"))
    }

    pub fn report_path(&self) -> PathBuf {
        self.dist_dir().join(REPORT_FILE)
    }
}
