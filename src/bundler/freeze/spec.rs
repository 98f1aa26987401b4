//! PyInstaller spec generation.

use super::template::SPEC_TEMPLATE;
use crate::bundler::{
    error::{ErrorExt, Result},
    settings::Settings,
};
use handlebars::Handlebars;
use std::{collections::BTreeMap, path::PathBuf};

/// A Python string literal. JSON string escapes are a subset of Python's.
pub fn py_str(value: &str) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

pub fn py_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

/// A Python list, one element per line.
pub fn py_list<I>(items: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let items: Vec<String> = items.into_iter().collect();
    if items.is_empty() {
        return "[]".to_string();
    }
    let mut out = String::from("[\n");
    for item in items {
        out.push_str("        ");
        out.push_str(&item);
        out.push_str(",\n");
    }
    out.push_str("    ]");
    out
}

fn path_str(path: PathBuf) -> Result<String> {
    py_str(&path.to_string_lossy())
}

/// Renders the PyInstaller spec file for the configured bundle.
///
/// All paths are written absolute, so the spec file does not depend on
/// PyInstaller's working directory.
pub fn render_spec(settings: &Settings, hidden_imports: &[String]) -> Result<String> {
    let bundle = settings.bundle();

    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.register_template_string("bundle.spec", SPEC_TEMPLATE)?;

    let pathex = std::iter::once(settings.project_dir().to_path_buf())
        .chain(bundle.pathex.iter().map(|p| settings.resolve(p)))
        .map(path_str)
        .collect::<Result<Vec<_>>>()?;

    let datas = bundle
        .datas
        .iter()
        .map(|data| {
            Ok(format!(
                "({}, {})",
                path_str(settings.resolve(&data.source))?,
                py_str(&data.dest)?
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    let hidden = hidden_imports
        .iter()
        .map(|m| py_str(m))
        .collect::<Result<Vec<_>>>()?;
    let excludes = bundle
        .excludes
        .iter()
        .map(|m| py_str(m))
        .collect::<Result<Vec<_>>>()?;

    let icon = match &bundle.icon {
        Some(icon) => path_str(settings.resolve(icon))?,
        None => "None".to_string(),
    };

    let mut data = BTreeMap::new();
    data.insert("name", bundle.name.clone());
    data.insert("name_literal", py_str(&bundle.name)?);
    data.insert("entry_point", path_str(settings.entry_point_path())?);
    data.insert("pathex", py_list(pathex));
    data.insert("datas", py_list(datas));
    data.insert("hidden_imports", py_list(hidden));
    data.insert("excludes", py_list(excludes));
    data.insert("upx", py_bool(bundle.upx).to_string());
    data.insert("console", py_bool(bundle.console).to_string());
    data.insert("icon", icon);

    Ok(handlebars.render("bundle.spec", &data)?)
}

/// Renders the spec file and writes it to its fixed location in the build directory.
pub async fn write_spec(settings: &Settings, hidden_imports: &[String]) -> Result<PathBuf> {
    let content = render_spec(settings, hidden_imports)?;
    let path = settings.spec_path();
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .fs_context("creating build directory", parent)?;
    }
    tokio::fs::write(&path, content)
        .await
        .fs_context("writing PyInstaller spec", &path)?;
    log::debug!("Wrote {}", path.display());
    Ok(path)
}
