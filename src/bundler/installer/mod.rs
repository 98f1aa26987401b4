//! Installer stage.
//!
//! Installer problems never fail the pipeline: a missing compiler, a missing
//! output file or any error while compiling is reported as an
//! [`InstallerOutcome`] and the bundle is still usable on its own.

pub mod inno;

use crate::bundler::{BundledArtifact, Result, settings::Settings};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Log file name for this stage.
pub const LOG_NAME: &str = "installer";

/// What the installer stage produced.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum InstallerOutcome {
    /// The installer exists at its version-stamped path.
    Built(BundledArtifact),
    /// No Inno Setup compiler was found; the generated script can be
    /// compiled by hand.
    ToolNotFound {
        script: PathBuf,
        searched: Vec<String>,
    },
    /// The compiler ran but the expected installer file is absent.
    OutputMissing { expected: PathBuf, log: PathBuf },
    /// Script generation or the compiler run failed with an error.
    Failed {
        error: String,
        log: Option<PathBuf>,
    },
    /// The operator asked to skip this stage.
    Skipped,
}

impl InstallerOutcome {
    pub fn artifact(&self) -> Option<&BundledArtifact> {
        match self {
            InstallerOutcome::Built(artifact) => Some(artifact),
            _ => None,
        }
    }

    pub fn is_built(&self) -> bool {
        self.artifact().is_some()
    }
}

/// Builds the installer with the compiler found in the process environment.
pub async fn build_installer(settings: &Settings) -> InstallerOutcome {
    let result = inno::build_installer(settings, &inno::ToolSearch::from_env()).await;
    into_outcome(settings, result)
}

/// Folds an installer error into [`InstallerOutcome::Failed`].
fn into_outcome(settings: &Settings, result: Result<InstallerOutcome>) -> InstallerOutcome {
    match result {
        Ok(outcome) => outcome,
        Err(error) => {
            log::warn!("Installer stage failed: {}", error);
            let log = error
                .log_path()
                .map(Path::to_path_buf)
                .or_else(|| {
                    let log = settings.log_path(LOG_NAME);
                    let has_content = std::fs::metadata(&log).map(|m| m.len() > 0).unwrap_or(false);
                    has_content.then_some(log)
                });
            InstallerOutcome::Failed {
                error: error.to_string(),
                log,
            }
        }
    }
}
