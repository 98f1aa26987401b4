//! Environment preparation: the isolated interpreter and its packages.
//!
//! # Process
//!
//! 1. Reuse the environment if its interpreter exists, otherwise create it
//!    with `python -m venv` (removing a half-created directory first)
//! 2. Check the interpreter version against the supported range
//! 3. Install or upgrade every requirement plus the bundler package with a
//!    single `pip install` call
//!
//! Any failure is fatal for the pipeline; nothing is retried.

mod python;
mod requirements;
mod verify;

pub use python::{PythonEnv, PythonVersion, VersionStatus, classify, find_system_python};
pub use requirements::{Requirement, load_requirements, normalize_name, parse_requirements};
pub use verify::{VerificationReport, installed_packages, missing_dependencies, verify};

use crate::bundler::{
    error::{Context, Error, Result},
    settings::Settings,
    utils::{fs, process},
};
use tokio::process::Command;

/// Log file name for this stage.
pub const LOG_NAME: &str = "environment";

/// Result of a successful preparation.
#[derive(Debug, Clone)]
pub struct PreparedEnvironment {
    pub env: PythonEnv,
    pub version: PythonVersion,
    /// Whether this run created the environment.
    pub created: bool,
    pub requirements: Vec<Requirement>,
}

/// Makes sure the isolated environment exists and holds every declared package.
pub async fn prepare(settings: &Settings) -> Result<PreparedEnvironment> {
    let log = settings.log_path(LOG_NAME);
    process::reset_log(&log).await?;

    let requirements = load_requirements(&settings.requirements_path()).await?;
    log::info!(
        "Dependency manifest lists {} package(s)",
        requirements.len()
    );

    let env = PythonEnv::at(settings.venv_dir());
    let created = ensure_environment(settings, &env, &log).await?;

    let version = env
        .version()
        .await
        .context("probing the environment's interpreter")?;
    let environment = settings.environment();
    match classify(version, environment.min_python, environment.max_tested_python) {
        VersionStatus::TooOld => {
            return Err(Error::PythonTooOld {
                found: version,
                required: environment.min_python,
            });
        }
        VersionStatus::Untested => log::warn!(
            "Python {} is newer than the newest tested version {}; continuing",
            version,
            environment.max_tested_python
        ),
        VersionStatus::Supported => log::info!("Python {} is supported", version),
    }

    install_packages(settings, &env, &log).await?;

    Ok(PreparedEnvironment {
        env,
        version,
        created,
        requirements,
    })
}

/// Returns the environment for an existing directory without modifying it.
///
/// Used by verification, which must not install anything.
pub fn existing(settings: &Settings) -> Result<PythonEnv> {
    let env = PythonEnv::at(settings.venv_dir());
    if !env.is_present() {
        crate::bail!(
            "no prepared environment at {}; run a full build first",
            env.root().display()
        );
    }
    Ok(env)
}

/// Creates the environment when its interpreter is missing. Returns whether it did.
async fn ensure_environment(
    settings: &Settings,
    env: &PythonEnv,
    log: &std::path::Path,
) -> Result<bool> {
    if env.is_present() {
        log::info!("Reusing environment at {}", env.root().display());
        return Ok(false);
    }

    if fs::remove_dir_all(env.root()).await? {
        log::warn!(
            "Removed incomplete environment at {} (no interpreter)",
            env.root().display()
        );
    }

    let system_python = find_system_python(settings.environment().python.as_deref())?;
    log::info!(
        "Creating environment at {} with {}",
        env.root().display(),
        system_python.display()
    );

    let mut command = Command::new(&system_python);
    command
        .arg("-m")
        .arg("venv")
        .arg(env.root())
        .current_dir(settings.project_dir());
    let status = process::run_logged(command, log).await?;
    if !status.success() {
        return Err(Error::ToolFailed {
            tool: format!("{} -m venv", system_python.display()),
            status,
            log: log.to_path_buf(),
        });
    }

    if !env.is_present() {
        crate::bail!(
            "environment creation reported success but {} does not exist",
            env.interpreter().display()
        );
    }

    Ok(true)
}

/// One `pip install --upgrade -r requirements.txt <bundler>` invocation.
async fn install_packages(settings: &Settings, env: &PythonEnv, log: &std::path::Path) -> Result<()> {
    let mut command = env.module("pip");
    command
        .arg("install")
        .arg("--upgrade")
        .arg("--disable-pip-version-check")
        .arg("-r")
        .arg(settings.requirements_path())
        .arg(&settings.environment().bundler_package)
        .current_dir(settings.project_dir());

    let status = process::run_logged(command, log).await?;
    if !status.success() {
        return Err(Error::ToolFailed {
            tool: "pip install".to_string(),
            status,
            log: log.to_path_buf(),
        });
    }

    log::info!("Dependencies installed");
    Ok(())
}
