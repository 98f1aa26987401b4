//! Bundle manifest (`[bundle]` in `bundle.toml`).

use super::default_true;
use std::path::PathBuf;

/// An auxiliary data file (or glob) copied verbatim into the bundle.
///
/// # Example
///
/// ```toml
/// [[bundle.datas]]
/// source = "data/*.xlsx"
/// dest = "data"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataFile {
    /// Source path or glob, relative to the project directory.
    pub source: String,

    /// Destination directory inside the bundle.
    pub dest: String,
}

impl DataFile {
    pub fn new(source: impl Into<String>, dest: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
        }
    }
}

/// Declarative description of what PyInstaller must package.
///
/// Every module the application imports dynamically must be listed in
/// `hidden_imports` (or in `hidden_imports_file`): static import analysis
/// cannot see those modules, and a missing one only fails once the frozen
/// launcher runs, never from a source checkout.
///
/// # Configuration
///
/// ```toml
/// [bundle]
/// name = "SmartClassPlanner"
/// entry_point = "smart_class_planner/main.py"
/// package = "smart_class_planner"
/// hidden_imports = ["smart_class_planner.presentation.setup_wizard"]
/// excludes = ["pytest"]
/// console = false
/// icon = "assets/icon.ico"
/// ```
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BundleSettings {
    /// Bundle and launcher name (no extension).
    ///
    /// The launcher ends up at `dist/<name>/<name>[.exe]`.
    pub name: String,

    /// Application entry point script, relative to the project directory.
    pub entry_point: PathBuf,

    /// Application package root, scanned to check the manifest is complete.
    ///
    /// Default: None (no completeness scan)
    #[serde(default)]
    pub package: Option<String>,

    /// Extra import search paths.
    ///
    /// Default: the project directory only
    #[serde(default)]
    pub pathex: Vec<PathBuf>,

    /// Modules to force-include, in order.
    #[serde(default)]
    pub hidden_imports: Vec<String>,

    /// Module list kept next to the application (one module per line).
    ///
    /// Its entries are appended to `hidden_imports`.
    #[serde(default)]
    pub hidden_imports_file: Option<PathBuf>,

    /// Application modules that are never imported by the launcher
    /// (maintenance scripts, test harnesses) and need not be declared.
    #[serde(default)]
    pub manifest_ignore: Vec<String>,

    /// Data files copied verbatim.
    #[serde(default)]
    pub datas: Vec<DataFile>,

    /// Modules to leave out even if discovered.
    ///
    /// Default: test frameworks (`pytest` and its plugins, `coverage`)
    #[serde(default = "default_excludes")]
    pub excludes: Vec<String>,

    /// Show a console window next to the GUI.
    ///
    /// Default: false
    #[serde(default)]
    pub console: bool,

    /// Compress the launcher with UPX when available.
    ///
    /// Default: true
    #[serde(default = "default_true")]
    pub upx: bool,

    /// Launcher icon (.ico), relative to the project directory.
    #[serde(default)]
    pub icon: Option<PathBuf>,

    /// Refuse to bundle when application modules are undeclared.
    ///
    /// Default: true
    #[serde(default = "default_true")]
    pub strict_manifest: bool,
}

fn default_excludes() -> Vec<String> {
    ["pytest", "_pytest", "pluggy", "iniconfig", "pytest_cov", "coverage"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl BundleSettings {
    /// Creates a manifest with defaults for everything but the name and entry point.
    pub fn new(name: impl Into<String>, entry_point: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            entry_point: entry_point.into(),
            package: None,
            pathex: Vec::new(),
            hidden_imports: Vec::new(),
            hidden_imports_file: None,
            manifest_ignore: Vec::new(),
            datas: Vec::new(),
            excludes: default_excludes(),
            console: false,
            upx: true,
            icon: None,
            strict_manifest: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_with_defaults() {
        let settings: BundleSettings = toml::from_str(
            r#"
            name = "SmartClassPlanner"
            entry_point = "smart_class_planner/main.py"
            "#,
        )
        .unwrap();

        assert!(!settings.console);
        assert!(settings.upx);
        assert!(settings.strict_manifest);
        assert!(settings.excludes.contains(&"pytest".to_string()));
        assert!(settings.hidden_imports.is_empty());
    }

    #[test]
    fn rejects_unknown_keys() {
        let result: Result<BundleSettings, _> = toml::from_str(
            r#"
            name = "App"
            entry_point = "main.py"
            onefile = true
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn parses_data_files() {
        let settings: BundleSettings = toml::from_str(
            r#"
            name = "App"
            entry_point = "main.py"

            [[datas]]
            source = "data/*.xlsx"
            dest = "data"
            "#,
        )
        .unwrap();
        assert_eq!(settings.datas, vec![DataFile::new("data/*.xlsx", "data")]);
    }
}
