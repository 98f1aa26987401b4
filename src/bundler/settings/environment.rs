//! Isolated environment settings (`[environment]` in `bundle.toml`).

use crate::bundler::environment::PythonVersion;
use std::path::PathBuf;

/// Where the isolated environment lives and what goes into it.
///
/// # Configuration
///
/// ```toml
/// [environment]
/// venv_dir = "venv"
/// requirements = "requirements.txt"
/// python = "py"
/// min_python = "3.12"
/// max_tested_python = "3.14"
/// ```
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvironmentSettings {
    /// Environment directory, relative to the project directory.
    ///
    /// Default: `venv`
    pub venv_dir: PathBuf,

    /// Dependency manifest, relative to the project directory.
    ///
    /// Default: `requirements.txt`
    pub requirements: PathBuf,

    /// Interpreter used to create the environment (name on `PATH` or a path).
    ///
    /// Default: None (first of `python3`, `python`, `py` on `PATH`)
    pub python: Option<String>,

    /// Oldest interpreter the application supports.
    ///
    /// Default: 3.12
    pub min_python: PythonVersion,

    /// Newest interpreter the application was tested with. Newer versions
    /// are accepted with a warning.
    ///
    /// Default: 3.14
    pub max_tested_python: PythonVersion,

    /// Package that provides the bundler, installed next to the requirements.
    ///
    /// Default: `pyinstaller`
    pub bundler_package: String,
}

impl Default for EnvironmentSettings {
    fn default() -> Self {
        Self {
            venv_dir: PathBuf::from("venv"),
            requirements: PathBuf::from("requirements.txt"),
            python: None,
            min_python: PythonVersion::new(3, 12, 0),
            max_tested_python: PythonVersion::new(3, 14, 0),
            bundler_package: "pyinstaller".to_string(),
        }
    }
}
