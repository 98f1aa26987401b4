//! Inno Setup script generation.
//!
//! Renders the `.iss` script from the installer descriptor and the bundle
//! layout using Handlebars.

use super::{template::ISS_TEMPLATE, utils};
use crate::bundler::{error::Result, settings::Settings};
use handlebars::Handlebars;
use serde_json::{Value, json};
use std::{collections::BTreeMap, path::PathBuf};

/// Windows-style join for paths inside the installed tree.
fn win_join(root: &str, leaf: &str) -> String {
    format!("{root}\\{leaf}")
}

/// Renders the installer script.
pub fn render_iss(settings: &Settings) -> Result<String> {
    let installer = settings.installer();
    let version = installer.semver()?;

    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.register_template_string("installer.iss", ISS_TEMPLATE)?;

    let name = utils::iss_quote(&installer.name);
    let launcher = utils::iss_quote(&settings.launcher_file_name());
    let (privileges_required, privileges_overrides) =
        utils::privileges(installer.scope, installer.allow_elevation);
    let compression = utils::map_compression(installer.compression);

    let bundle_source = settings.app_dir().join("*");

    let mut data: BTreeMap<&str, Value> = BTreeMap::new();
    data.insert("name", json!(installer.name));
    data.insert("version", json!(installer.version.trim()));
    data.insert("app_id", json!(utils::format_app_id(&utils::app_id(installer)?)));
    data.insert("app_name", json!(utils::escape_constants(&installer.name)));
    data.insert("version_info", json!(utils::version_info(&version)));
    data.insert(
        "default_dir",
        json!(win_join("{autopf}", &utils::escape_constants(&installer.name))),
    );
    data.insert("privileges_required", json!(privileges_required));
    data.insert("privileges_overrides", json!(privileges_overrides));
    data.insert(
        "output_dir",
        json!(utils::escape_constants(
            &settings.installer_output_dir().to_string_lossy()
        )),
    );
    data.insert("output_base_filename", json!(installer.output_base_filename()));
    data.insert("compression", json!(compression));
    data.insert(
        "solid_compression",
        json!(if compression.starts_with("lzma") { "yes" } else { "no" }),
    );
    data.insert(
        "bundle_source",
        json!(utils::iss_quote(&bundle_source.to_string_lossy())),
    );
    data.insert("launcher_target", json!(win_join("{app}", &launcher)));
    data.insert("group_icon", json!(win_join("{group}", &name)));
    data.insert(
        "group_uninstall",
        json!(win_join(
            "{group}",
            &format!("{{cm:UninstallProgram,{}}}", utils::cm_arg(&installer.name))
        )),
    );
    data.insert("desktop_icon", json!(win_join("{autodesktop}", &name)));
    data.insert(
        "launch_description",
        json!(format!(
            "{{cm:LaunchProgram,{}}}",
            utils::cm_arg(&installer.name)
        )),
    );
    data.insert("start_menu", json!(installer.start_menu));
    data.insert("desktop_shortcut", json!(installer.desktop_shortcut));
    data.insert("launch_after_install", json!(installer.launch_after_install));

    if let Some(publisher) = &installer.publisher {
        data.insert("publisher", json!(utils::escape_constants(publisher)));
    }
    if let Some(url) = &installer.url {
        data.insert("url", json!(utils::escape_constants(url)));
    }
    if let Some(icon) = &installer.icon {
        data.insert(
            "setup_icon",
            json!(utils::escape_constants(&settings.resolve(icon).to_string_lossy())),
        );
    }
    if let Some(license) = &installer.license_file {
        data.insert(
            "license_file",
            json!(utils::escape_constants(
                &settings.resolve(license).to_string_lossy()
            )),
        );
    }

    Ok(handlebars.render("installer.iss", &data)?)
}

/// Renders the script and writes it with a UTF-8 BOM to its fixed location.
pub async fn generate_iss_script(settings: &Settings) -> Result<PathBuf> {
    let content = render_iss(settings)?;
    let path = settings.iss_path();
    if let Some(parent) = path.parent() {
        crate::bundler::utils::fs::create_dir_all(parent, false).await?;
    }
    utils::write_utf8_bom(&path, &content).await?;
    log::debug!("Wrote {}", path.display());
    Ok(path)
}
