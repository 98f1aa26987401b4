//! Read-only checks against an already prepared environment.

use super::{PythonEnv, PythonVersion, Requirement, VersionStatus, classify, load_requirements};
use crate::bundler::{
    error::Result,
    freeze::manifest,
    settings::Settings,
    utils::process,
};
use std::collections::BTreeSet;

/// Outcome of each verification check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationReport {
    /// Interpreter version, `None` if the probe failed.
    pub python: Option<(PythonVersion, VersionStatus)>,
    /// Whether the GUI toolkit imports.
    pub tkinter: bool,
    /// Requirements with no installed distribution (normalized names).
    pub missing_dependencies: Vec<String>,
    /// Application modules the bundle manifest does not declare.
    pub missing_modules: Vec<String>,
    /// Declared application modules that do not exist in the package.
    pub unknown_modules: Vec<String>,
    /// Declared modules that fail to import inside the environment.
    pub failed_imports: Vec<String>,
}

impl VerificationReport {
    /// `(check, passed, detail)` rows in display order.
    pub fn checks(&self) -> Vec<(&'static str, bool, String)> {
        let python = match self.python {
            Some((version, VersionStatus::Supported)) => (true, version.to_string()),
            Some((version, VersionStatus::Untested)) => (true, format!("{version} (untested)")),
            Some((version, VersionStatus::TooOld)) => (false, format!("{version} (too old)")),
            None => (false, "not runnable".to_string()),
        };

        vec![
            ("Python", python.0, python.1),
            (
                "Tkinter",
                self.tkinter,
                if self.tkinter { "available" } else { "import failed" }.to_string(),
            ),
            (
                "Dependencies",
                self.missing_dependencies.is_empty(),
                summarize(&self.missing_dependencies, "all installed"),
            ),
            (
                "Modules",
                self.modules_ok(),
                self.modules_detail(),
            ),
        ]
    }

    fn modules_ok(&self) -> bool {
        self.missing_modules.is_empty()
            && self.unknown_modules.is_empty()
            && self.failed_imports.is_empty()
    }

    fn modules_detail(&self) -> String {
        if self.modules_ok() {
            return "manifest complete".to_string();
        }
        [
            ("missing", &self.missing_modules),
            ("not found", &self.unknown_modules),
            ("import failed", &self.failed_imports),
        ]
        .into_iter()
        .filter(|(_, modules)| !modules.is_empty())
        .map(|(label, modules)| format!("{label}: {}", modules.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
    }

    pub fn passed(&self) -> bool {
        self.checks().iter().all(|(_, passed, _)| *passed)
    }
}

fn summarize(missing: &[String], ok: &str) -> String {
    if missing.is_empty() {
        ok.to_string()
    } else {
        format!("missing: {}", missing.join(", "))
    }
}

/// Normalized names of installed distributions from `pip list --format=freeze`.
pub fn installed_packages(freeze_output: &str) -> BTreeSet<String> {
    freeze_output
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            line.split_once("==")
                .or_else(|| line.split_once(" @ "))
                .map(|(name, _)| super::normalize_name(name))
        })
        .collect()
}

/// Requirements without a matching installed distribution.
pub fn missing_dependencies(
    requirements: &[Requirement],
    installed: &BTreeSet<String>,
) -> Vec<String> {
    requirements
        .iter()
        .map(Requirement::normalized_name)
        .filter(|name| !installed.contains(name))
        .collect()
}

/// Runs every check. Individual check failures are reported, not raised;
/// an error means verification itself could not run.
pub async fn verify(settings: &Settings, env: &PythonEnv) -> Result<VerificationReport> {
    let environment = settings.environment();

    let python = match env.version().await {
        Ok(version) => Some((
            version,
            classify(version, environment.min_python, environment.max_tested_python),
        )),
        Err(e) => {
            log::warn!("Interpreter probe failed: {}", e);
            None
        }
    };

    let mut tk_probe = env.command();
    tk_probe.arg("-c").arg("import tkinter");
    let (tk_status, _) = process::capture(tk_probe).await?;

    let requirements = load_requirements(&settings.requirements_path()).await?;
    let mut pip_list = env.module("pip");
    pip_list
        .arg("list")
        .arg("--format=freeze")
        .arg("--disable-pip-version-check");
    let (list_status, listing) = process::capture(pip_list).await?;
    let missing_dependencies = if list_status.success() {
        missing_dependencies(&requirements, &installed_packages(&listing))
    } else {
        log::warn!("`pip list` failed ({}); treating all requirements as missing", list_status);
        requirements.iter().map(Requirement::normalized_name).collect()
    };

    let check = manifest::check_manifest(settings).await?;
    let failed_imports = failed_imports(settings, env, &check.hidden_imports).await?;

    Ok(VerificationReport {
        python,
        tkinter: tk_status.success(),
        missing_dependencies,
        missing_modules: check.missing,
        unknown_modules: check.unknown,
        failed_imports,
    })
}

/// Imports each declared module in the environment, from the project directory.
async fn failed_imports(
    settings: &Settings,
    env: &PythonEnv,
    modules: &[String],
) -> Result<Vec<String>> {
    let mut failed = Vec::new();
    for module in modules {
        let mut probe = env.command();
        probe
            .arg("-c")
            .arg(format!("import {module}"))
            .current_dir(settings.project_dir());
        let (status, _) = process::capture(probe).await?;
        if !status.success() {
            log::debug!("`import {}` failed ({})", module, status);
            failed.push(module.clone());
        }
    }
    Ok(failed)
}
