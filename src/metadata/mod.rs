//! Project configuration discovery: `bundle.toml` and `installer.toml`.

use crate::bundler::{BundleSettings, EnvironmentSettings, InstallerSettings, Settings, SettingsBuilder};
use crate::error::{BundlerError, CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Bundle manifest file name, at the project root.
pub const BUNDLE_MANIFEST: &str = "bundle.toml";

/// Installer descriptor file name, at the project root.
pub const INSTALLER_DESCRIPTOR: &str = "installer.toml";

/// Conventional icon locations, tried in order when none is configured.
const ICON_CANDIDATES: [&str; 2] = ["assets/icon.ico", "assets/img/icon.ico"];

/// Raw `bundle.toml` layout.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BundleManifestFile {
    #[serde(default)]
    environment: EnvironmentSettings,
    bundle: BundleSettings,
}

/// Everything read from the project's configuration files.
#[derive(Debug, Clone)]
pub struct ProjectManifest {
    pub project_dir: PathBuf,
    pub environment: EnvironmentSettings,
    pub bundle: BundleSettings,
    pub installer: InstallerSettings,
}

/// Reads both configuration files from `project_dir`.
pub fn load_manifest(project_dir: &Path) -> Result<ProjectManifest> {
    let bundle_path = project_dir.join(BUNDLE_MANIFEST);
    let manifest: BundleManifestFile = read_toml(&bundle_path)?;

    let installer_path = project_dir.join(INSTALLER_DESCRIPTOR);
    let installer: InstallerSettings = read_toml(&installer_path)?;

    let mut manifest = ProjectManifest {
        project_dir: project_dir.to_path_buf(),
        environment: manifest.environment,
        bundle: manifest.bundle,
        installer,
    };
    discover_icon(&mut manifest);

    Ok(manifest)
}

/// Loads the configuration files and builds validated [`Settings`].
pub fn load_settings(project_dir: &Path) -> Result<Settings> {
    let manifest = load_manifest(project_dir)?;
    let settings = SettingsBuilder::new()
        .project_dir(&manifest.project_dir)
        .environment_settings(manifest.environment)
        .bundle_settings(manifest.bundle)
        .installer_settings(manifest.installer)
        .build()?;
    Ok(settings)
}

fn read_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        BundlerError::Cli(CliError::InvalidConfig {
            path: path.to_path_buf(),
            reason: format!("cannot read file: {}", e),
        })
    })?;

    toml::from_str(&content).map_err(|e| {
        BundlerError::Cli(CliError::InvalidConfig {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    })
}

/// Fills unset bundle and installer icons from the conventional locations.
fn discover_icon(manifest: &mut ProjectManifest) {
    if manifest.bundle.icon.is_some() && manifest.installer.icon.is_some() {
        return;
    }

    let Some(found) = ICON_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|candidate| manifest.project_dir.join(candidate).is_file())
    else {
        log::debug!("No icon configured or found in assets/");
        return;
    };

    log::info!("Using icon {}", found.display());
    if manifest.bundle.icon.is_none() {
        manifest.bundle.icon = Some(found.clone());
    }
    if manifest.installer.icon.is_none() {
        manifest.installer.icon = Some(found);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUNDLE: &str = r#"
[environment]
min_python = "3.12"

[bundle]
name = "SmartClassPlanner"
entry_point = "smart_class_planner/main.py"
package = "smart_class_planner"
hidden_imports = ["smart_class_planner.presentation.setup_wizard"]
datas = [{ source = "data/*.xlsx", dest = "data" }]
"#;

    const INSTALLER: &str = r#"
name = "Smart Class Planner"
version = "1.0.0"
publisher = "Planner Team"
identifier = "edu.example.smart-class-planner"
"#;

    fn project(bundle: &str, installer: Option<&str>) -> tempfile::TempDir {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join(BUNDLE_MANIFEST), bundle).unwrap();
        if let Some(installer) = installer {
            std::fs::write(temp.path().join(INSTALLER_DESCRIPTOR), installer).unwrap();
        }
        temp
    }

    #[test]
    fn loads_both_files() {
        let temp = project(BUNDLE, Some(INSTALLER));
        let settings = load_settings(temp.path()).unwrap();

        assert_eq!(settings.bundle().name, "SmartClassPlanner");
        assert_eq!(settings.bundle().datas[0].dest, "data");
        assert_eq!(settings.installer().publisher.as_deref(), Some("Planner Team"));
        assert_eq!(settings.environment().venv_dir, PathBuf::from("venv"));
        assert!(settings.bundle().strict_manifest);
    }

    #[test]
    fn missing_descriptor_names_the_file() {
        let temp = project(BUNDLE, None);
        let err = load_manifest(temp.path()).unwrap_err();
        assert!(err.to_string().contains(INSTALLER_DESCRIPTOR));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let temp = project("[bundle]\nname = \"A\"\nentry_point = \"a.py\"\nonefile = true\n", Some(INSTALLER));
        let err = load_manifest(temp.path()).unwrap_err();
        assert!(err.to_string().contains(BUNDLE_MANIFEST));
    }

    #[test]
    fn conventional_icon_is_used_when_unset() {
        let temp = project(BUNDLE, Some(INSTALLER));
        std::fs::create_dir_all(temp.path().join("assets")).unwrap();
        std::fs::write(temp.path().join("assets/icon.ico"), b"ico").unwrap();

        let manifest = load_manifest(temp.path()).unwrap();
        assert_eq!(manifest.bundle.icon, Some(PathBuf::from("assets/icon.ico")));
        assert_eq!(manifest.installer.icon, Some(PathBuf::from("assets/icon.ico")));
    }

    #[test]
    fn invalid_version_is_a_settings_error() {
        let temp = project(BUNDLE, Some(&INSTALLER.replace("1.0.0", "1.0")));
        let err = load_settings(temp.path()).unwrap_err();
        assert!(matches!(err, BundlerError::Bundler(_)));
    }

    #[test]
    fn demo_configuration_loads() {
        let demo = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/smart_class_planner");
        let settings = load_settings(&demo).unwrap();

        assert_eq!(settings.bundle().package.as_deref(), Some("smart_class_planner"));
        assert_eq!(settings.installer().scope, crate::bundler::InstallScope::User);
        assert!(settings.installer().launch_after_install);
    }

    #[tokio::test]
    async fn demo_manifest_matches_planner_package() {
        const PLANNER_MODULES: [&str; 19] = [
            "main",
            "application/plan_generator",
            "application/planner",
            "application/validator",
            "domain/course",
            "domain/offering",
            "domain/prerequisite",
            "domain/repository",
            "domain/studyplansequence",
            "infrastructure/abstract_parser",
            "infrastructure/data_loader",
            "infrastructure/infrastructure_check",
            "infrastructure/pdf_parser",
            "infrastructure/prereq_graph_parser",
            "infrastructure/program_map_scraper",
            "infrastructure/scraper",
            "infrastructure/study_plan_parser",
            "presentation/excel_exporter",
            "presentation/setup_wizard",
        ];

        let demo = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/smart_class_planner");
        let temp = tempfile::tempdir().unwrap();
        for file in [BUNDLE_MANIFEST, INSTALLER_DESCRIPTOR, "requirements.txt"] {
            std::fs::copy(demo.join(file), temp.path().join(file)).unwrap();
        }
        for module in PLANNER_MODULES {
            let path = temp.path().join(format!("smart_class_planner/{module}.py"));
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, "").unwrap();
        }
        std::fs::create_dir_all(temp.path().join("data")).unwrap();
        std::fs::write(temp.path().join("data/4-year schedule.xlsx"), b"xlsx").unwrap();

        let settings = load_settings(temp.path()).unwrap();
        let check = crate::bundler::freeze::manifest::check_manifest(&settings)
            .await
            .unwrap();
        assert!(check.missing.is_empty(), "undeclared: {:?}", check.missing);
        assert!(check.unknown.is_empty(), "unknown: {:?}", check.unknown);
        crate::bundler::freeze::manifest::validate_manifest(&settings)
            .await
            .unwrap();
    }
}
