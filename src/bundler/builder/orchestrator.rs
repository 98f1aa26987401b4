//! Pipeline orchestration.
//!
//! [`Pipeline`] runs the three stages against one [`Settings`]. Each stage
//! is a separate call so the caller can narrate stage boundaries; calling
//! them in order is the caller's job, and every later stage takes the
//! earlier stage's output.

use crate::bundler::{
    BundledArtifact, Result, Settings,
    environment::{self, PreparedEnvironment, PythonVersion},
    error::ErrorExt,
    freeze,
    installer::{self, InstallerOutcome},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::{fmt, path::PathBuf};

/// A pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Environment,
    Bundle,
    Installer,
}

impl Stage {
    /// Name of the log file the stage's subprocesses write to.
    pub fn log_name(self) -> &'static str {
        match self {
            Stage::Environment => environment::LOG_NAME,
            Stage::Bundle => freeze::LOG_NAME,
            Stage::Installer => installer::LOG_NAME,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Stage::Environment => "Preparing environment",
            Stage::Bundle => "Bundling application",
            Stage::Installer => "Building installer",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Environment => write!(f, "environment"),
            Stage::Bundle => write!(f, "bundle"),
            Stage::Installer => write!(f, "installer"),
        }
    }
}

/// Overall result of a run that got past the bundle stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunStatus {
    /// Bundle and installer produced.
    Success,
    /// Bundle produced, installer not.
    PartialSuccess,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Success => write!(f, "SUCCESS"),
            RunStatus::PartialSuccess => write!(f, "PARTIAL SUCCESS"),
        }
    }
}

/// Summary written to `dist/packaging-report.json`.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub generated_at: DateTime<Utc>,
    pub status: RunStatus,
    pub app: String,
    pub version: String,
    pub python: PythonVersion,
    pub environment_created: bool,
    pub bundle: BundledArtifact,
    pub installer: InstallerOutcome,
}

impl PipelineReport {
    pub fn new(
        settings: &Settings,
        environment: &PreparedEnvironment,
        bundle: BundledArtifact,
        installer: InstallerOutcome,
    ) -> Self {
        let status = if installer.is_built() {
            RunStatus::Success
        } else {
            RunStatus::PartialSuccess
        };
        Self {
            generated_at: Utc::now(),
            status,
            app: settings.bundle().name.clone(),
            version: settings.installer().version.trim().to_string(),
            python: environment.version,
            environment_created: environment.created,
            bundle,
            installer,
        }
    }
}

/// Runs the packaging stages for one project.
#[derive(Debug, Clone)]
pub struct Pipeline {
    settings: Settings,
}

impl Pipeline {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Log file for a stage.
    pub fn log_path(&self, stage: Stage) -> PathBuf {
        self.settings.log_path(stage.log_name())
    }

    /// Stage 1: create or reuse the environment and install dependencies.
    pub async fn prepare_environment(&self) -> Result<PreparedEnvironment> {
        environment::prepare(&self.settings).await
    }

    /// Stage 2: produce the one-folder bundle.
    pub async fn bundle(&self, prepared: &PreparedEnvironment) -> Result<BundledArtifact> {
        freeze::bundle_project(&self.settings, &prepared.env).await
    }

    /// Stage 3: wrap the bundle into an installer unless `skip` is set.
    ///
    /// Never fails; problems come back as a non-built [`InstallerOutcome`].
    pub async fn build_installer(&self, skip: bool) -> InstallerOutcome {
        if skip {
            log::info!("Installer stage skipped");
            return InstallerOutcome::Skipped;
        }
        installer::build_installer(&self.settings).await
    }

    /// Writes the run summary next to the bundle.
    pub async fn write_report(&self, report: &PipelineReport) -> Result<PathBuf> {
        let path = self.settings.report_path();
        let json = serde_json::to_string_pretty(report)?;
        tokio::fs::write(&path, json)
            .await
            .fs_context("writing packaging report", &path)?;
        Ok(path)
    }
}
