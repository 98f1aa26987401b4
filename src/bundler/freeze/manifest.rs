//! Bundle manifest resolution and completeness checks.
//!
//! PyInstaller follows static imports only. Modules the application loads
//! dynamically must be force-included, and forgetting one produces a launcher
//! that fails at runtime while the source checkout keeps working. The checks
//! here compare the declared module list with the modules that actually exist
//! in the application package, so the gap is caught before bundling.

use crate::bundler::{
    error::{Error, ErrorExt, Result},
    settings::Settings,
};
use std::{
    collections::{BTreeSet, HashSet},
    path::Path,
};

/// Declared modules compared with the application package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestCheck {
    /// Force-included modules in declaration order.
    pub hidden_imports: Vec<String>,
    /// Application modules that are neither declared nor ignored.
    pub missing: Vec<String>,
    /// Declared modules under the application package that do not exist.
    pub unknown: Vec<String>,
}

impl ManifestCheck {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.unknown.is_empty()
    }
}

/// Whether `module` is one of `prefixes` or lies below one of them.
fn covered_by(module: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|prefix| {
        module == prefix
            || module
                .strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.starts_with('.'))
    })
}

/// Parses a module list: one dotted name per line, `#` starts a comment.
pub fn parse_module_list(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// `hidden_imports` followed by the co-located module list, first occurrence wins.
pub async fn resolve_hidden_imports(settings: &Settings) -> Result<Vec<String>> {
    let bundle = settings.bundle();
    let mut modules = bundle.hidden_imports.clone();

    if let Some(file) = &bundle.hidden_imports_file {
        let path = settings.resolve(file);
        let text = tokio::fs::read_to_string(&path)
            .await
            .fs_context("reading module list", &path)?;
        let listed = parse_module_list(&text);
        log::debug!("{} lists {} module(s)", path.display(), listed.len());
        modules.extend(listed);
    }

    let mut seen = HashSet::new();
    modules.retain(|module| seen.insert(module.clone()));
    Ok(modules)
}

/// Every module under `package` as a dotted name.
///
/// Files whose name starts with `__` (`__init__.py`, `__main__.py`) are
/// skipped: packages are pulled in by their submodules.
pub fn discover_package_modules(project_dir: &Path, package: &str) -> Result<BTreeSet<String>> {
    let root = project_dir.join(package.replace('.', "/"));
    if !root.is_dir() {
        return Err(Error::GenericError(format!(
            "application package `{}` not found at {}",
            package,
            root.display()
        )));
    }

    let mut modules = BTreeSet::new();
    for entry in walkdir::WalkDir::new(&root).follow_links(false) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let is_source = path.extension().is_some_and(|ext| ext == "py");
        let is_dunder = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with("__"));
        if !is_source || is_dunder {
            continue;
        }

        let relative = path.strip_prefix(project_dir)?.with_extension("");
        let dotted = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(".");
        modules.insert(dotted);
    }

    Ok(modules)
}

/// Discovered modules not covered by `declared` or `ignore`, sorted.
///
/// An ignore entry matches the module itself and everything below it.
pub fn missing_modules(
    declared: &[String],
    discovered: &BTreeSet<String>,
    ignore: &[String],
) -> Vec<String> {
    let declared: HashSet<&str> = declared.iter().map(String::as_str).collect();
    discovered
        .iter()
        .filter(|module| !declared.contains(module.as_str()))
        .filter(|module| !covered_by(module, ignore))
        .cloned()
        .collect()
}

/// Declared modules under `package` that match neither a discovered module
/// nor a package directory holding discovered modules.
///
/// Modules outside `package` (third-party libraries) are not checked here.
pub fn unknown_modules(
    declared: &[String],
    discovered: &BTreeSet<String>,
    package: &str,
) -> Vec<String> {
    let package = [package.to_string()];
    declared
        .iter()
        .filter(|module| covered_by(module, &package))
        .filter(|module| {
            let below = format!("{module}.");
            !discovered.contains(module.as_str())
                && !discovered.iter().any(|found| found.starts_with(&below))
        })
        .cloned()
        .collect()
}

/// Resolves the declared modules and compares them with the package.
pub async fn check_manifest(settings: &Settings) -> Result<ManifestCheck> {
    let hidden_imports = resolve_hidden_imports(settings).await?;

    let (missing, unknown) = match &settings.bundle().package {
        Some(package) => {
            let discovered = discover_package_modules(settings.project_dir(), package)?;
            (
                missing_modules(&hidden_imports, &discovered, &settings.bundle().manifest_ignore),
                unknown_modules(&hidden_imports, &discovered, package),
            )
        }
        None => (Vec::new(), Vec::new()),
    };

    Ok(ManifestCheck {
        hidden_imports,
        missing,
        unknown,
    })
}

/// Validates everything the bundle manifest points at.
///
/// Returns the force-include list to render into the PyInstaller spec file.
pub async fn validate_manifest(settings: &Settings) -> Result<Vec<String>> {
    let bundle = settings.bundle();

    let entry_point = settings.entry_point_path();
    if !entry_point.is_file() {
        crate::bail!("entry point {} does not exist", entry_point.display());
    }

    if let Some(icon) = &bundle.icon {
        let icon = settings.resolve(icon);
        if !icon.is_file() {
            crate::bail!("bundle icon {} does not exist", icon.display());
        }
    }

    for data in &bundle.datas {
        let pattern = settings.resolve(&data.source);
        let pattern = pattern.to_string_lossy();
        let matches = glob::glob(&pattern)?.filter_map(|entry| entry.ok()).count();
        if matches == 0 {
            crate::bail!("data file pattern `{}` matches nothing", data.source);
        }
        log::debug!("Data `{}` -> `{}`: {} match(es)", data.source, data.dest, matches);
    }

    let check = check_manifest(settings).await?;

    let conflicts: Vec<&str> = check
        .hidden_imports
        .iter()
        .map(String::as_str)
        .filter(|module| covered_by(module, &bundle.excludes))
        .collect();
    if !conflicts.is_empty() {
        crate::bail!(
            "module(s) both force-included and excluded: {}",
            conflicts.join(", ")
        );
    }

    if !check.unknown.is_empty() {
        if bundle.strict_manifest {
            return Err(Error::ManifestUnknownModules {
                modules: check.unknown,
            });
        }
        log::warn!(
            "Bundle manifest declares modules that do not exist: {} (strict_manifest = false)",
            check.unknown.join(", ")
        );
    }

    if !check.missing.is_empty() {
        if bundle.strict_manifest {
            return Err(Error::ManifestIncomplete {
                modules: check.missing,
            });
        }
        log::warn!(
            "Bundle manifest does not declare: {} (strict_manifest = false)",
            check.missing.join(", ")
        );
    }

    Ok(check.hidden_imports)
}
