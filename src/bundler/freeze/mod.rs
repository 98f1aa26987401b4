//! One-folder application bundle via PyInstaller.
//!
//! # Process
//!
//! 1. Delete `build/` and `dist/` so no artifact of a previous run survives
//! 2. Validate the bundle manifest (entry point, data, module list)
//! 3. Render the PyInstaller spec into `build/`
//! 4. Run PyInstaller inside the prepared environment
//! 5. Check that the launcher exists at its fixed location
//!
//! The launcher's existence is the only success signal. PyInstaller's exit
//! status is logged but not trusted on its own: warnings can produce a
//! non-zero status with a usable bundle.

pub mod manifest;
mod spec;
mod template;

pub use spec::{render_spec, write_spec};

use crate::bundler::{
    ArtifactKind, BundledArtifact,
    builder::checksum,
    environment::PythonEnv,
    error::{Error, Result},
    settings::Settings,
    utils::{fs, process},
};

/// Log file name for this stage.
pub const LOG_NAME: &str = "bundle";

/// Deletes the bundler's intermediate and output directories.
pub async fn clean_workspace(settings: &Settings) -> Result<()> {
    for dir in [settings.build_dir(), settings.dist_dir()] {
        if fs::remove_dir_all(&dir).await? {
            log::info!("Removed {}", dir.display());
        }
    }
    Ok(())
}

/// Produces the one-folder bundle and returns it as an artifact.
pub async fn bundle_project(settings: &Settings, env: &PythonEnv) -> Result<BundledArtifact> {
    let log = settings.log_path(LOG_NAME);
    process::reset_log(&log).await?;

    clean_workspace(settings).await?;

    let hidden_imports = manifest::validate_manifest(settings).await?;
    log::info!("Bundle manifest declares {} module(s)", hidden_imports.len());

    let spec_path = write_spec(settings, &hidden_imports).await?;

    let mut command = env.module("PyInstaller");
    command
        .arg("--noconfirm")
        .arg("--clean")
        .arg("--distpath")
        .arg(settings.dist_dir())
        .arg("--workpath")
        .arg(settings.work_dir())
        .arg(&spec_path)
        .current_dir(settings.project_dir());

    log::info!("Running PyInstaller for {}", settings.bundle().name);
    let status = process::run_logged(command, &log).await?;

    let launcher = settings.launcher_path();
    if !launcher.is_file() {
        return Err(Error::LauncherMissing {
            expected: launcher,
            log,
        });
    }
    if !status.success() {
        log::warn!(
            "PyInstaller exited with {} but the launcher exists; see {}",
            status,
            log.display()
        );
    }

    log::info!("Launcher ready at {}", launcher.display());
    checksum::describe_artifact(ArtifactKind::AppDirectory, &settings.app_dir()).await
}
