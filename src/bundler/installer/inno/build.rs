//! Inno Setup compiler execution.

use crate::bundler::{
    error::Result,
    settings::Settings,
    utils::{fs, process},
};
use std::{
    path::Path,
    process::ExitStatus,
};
use tokio::process::Command;

/// Runs `ISCC /Q /O<dir> /F<base> <script>` with output appended to `log`.
///
/// The output directory and file name are passed on the command line so
/// they always match the expected installer path, whatever the script says.
pub async fn run_iscc(
    compiler: &Path,
    iss_path: &Path,
    settings: &Settings,
    log: &Path,
) -> Result<ExitStatus> {
    let output_dir = settings.installer_output_dir();
    fs::create_dir_all(&output_dir, false).await?;

    let mut command = Command::new(compiler);
    command
        .arg("/Q")
        .arg(format!("/O{}", output_dir.display()))
        .arg(format!("/F{}", settings.installer().output_base_filename()))
        .arg(iss_path)
        .current_dir(settings.project_dir());

    log::info!("Running Inno Setup compiler...");
    process::run_logged(command, log).await
}
