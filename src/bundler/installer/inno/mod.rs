//! Windows installer creation with Inno Setup.
//!
//! # Module Organization
//!
//! - `template` - ISS script template
//! - `toolset` - compiler discovery on `PATH` and in the standard install locations
//! - `script` - ISS script generation from the template
//! - `build` - ISCC execution
//! - `utils` - AppId, version formatting, escaping, BOM writer

mod build;
mod script;
mod template;
mod toolset;
mod utils;

pub use script::{generate_iss_script, render_iss};
pub use toolset::{CompilerSource, InnoCompiler, ToolSearch, discover_compiler};
pub use utils::app_id;

use super::{InstallerOutcome, LOG_NAME};
use crate::bundler::{
    ArtifactKind,
    builder::checksum,
    error::{ErrorExt, Result},
    settings::Settings,
    utils::process,
};

/// Wraps the bundle into a single installer executable.
///
/// # Process
///
/// 1. Check that the bundle launcher exists
/// 2. Generate the ISS script (kept for a manual compile if ISCC is absent)
/// 3. Locate ISCC; report [`InstallerOutcome::ToolNotFound`] if absent
/// 4. Remove a previous installer with the same version, then compile
/// 5. Report [`InstallerOutcome::Built`] iff the expected installer exists
pub async fn build_installer(settings: &Settings, search: &ToolSearch) -> Result<InstallerOutcome> {
    let launcher = settings.launcher_path();
    if !launcher.is_file() {
        crate::bail!(
            "cannot build installer: launcher {} does not exist",
            launcher.display()
        );
    }

    let iss_path = generate_iss_script(settings).await?;

    let Some(compiler) = discover_compiler(search) else {
        log::warn!("Inno Setup compiler not found");
        return Ok(InstallerOutcome::ToolNotFound {
            script: iss_path,
            searched: search.describe(),
        });
    };
    log::info!(
        "Using Inno Setup compiler {} (found via {})",
        compiler.path.display(),
        compiler.source
    );

    let log = settings.log_path(LOG_NAME);
    process::reset_log(&log).await?;

    let expected = settings.installer_output_path();
    match tokio::fs::remove_file(&expected).await {
        Ok(()) => log::debug!("Removed previous {}", expected.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e).fs_context("removing previous installer", &expected),
    }

    let status = build::run_iscc(&compiler.path, &iss_path, settings, &log).await?;

    if !expected.is_file() {
        log::warn!("ISCC exited with {}; no installer at {}", status, expected.display());
        return Ok(InstallerOutcome::OutputMissing { expected, log });
    }
    if !status.success() {
        log::warn!("ISCC exited with {} but the installer exists", status);
    }

    log::info!("Created installer: {}", expected.display());
    let artifact = checksum::describe_artifact(ArtifactKind::Installer, &expected).await?;
    Ok(InstallerOutcome::Built(artifact))
}
