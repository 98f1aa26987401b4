//! Inno Setup utility functions.
//!
//! AppId derivation, version formatting, compression and privilege mapping,
//! string escaping and the BOM writer.

use crate::bundler::{
    error::{Error, ErrorExt, Result},
    settings::{InnoCompression, InstallScope, InstallerSettings},
};
use std::path::Path;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// The AppId GUID, uppercase and without braces.
///
/// An explicit `app_id` wins; otherwise the GUID is a UUID v5 of the
/// identifier in the DNS namespace, so every release of the same product
/// gets the same AppId.
pub fn app_id(settings: &InstallerSettings) -> Result<String> {
    let uuid = match &settings.app_id {
        Some(explicit) => {
            let trimmed = explicit.trim().trim_start_matches('{').trim_end_matches('}');
            Uuid::parse_str(trimmed).map_err(|e| {
                Error::GenericError(format!("invalid app_id `{}`: {}", explicit, e))
            })?
        }
        None => Uuid::new_v5(&Uuid::NAMESPACE_DNS, settings.identifier.trim().as_bytes()),
    };
    Ok(uuid.hyphenated().to_string().to_uppercase())
}

/// `AppId` directive value. Inno reads `{{` as a literal brace, so the
/// GUID keeps its braces in the registry key.
pub fn format_app_id(guid: &str) -> String {
    format!("{{{{{guid}}}")
}

/// Four-part version for `VersionInfoVersion`: `1.2.3` -> `1.2.3.0`.
///
/// Pre-release and build metadata are dropped; Windows version resources
/// hold numbers only.
pub fn version_info(version: &semver::Version) -> String {
    format!("{}.{}.{}.0", version.major, version.minor, version.patch)
}

/// Map compression setting to the `Compression` directive value.
pub fn map_compression(compression: InnoCompression) -> &'static str {
    match compression {
        InnoCompression::None => "none",
        InnoCompression::Zip => "zip",
        InnoCompression::Bzip => "bzip",
        InnoCompression::Lzma => "lzma",
        InnoCompression::Lzma2 => "lzma2",
    }
}

/// `PrivilegesRequired` and the optional `PrivilegesRequiredOverridesAllowed`.
pub fn privileges(scope: InstallScope, allow_elevation: bool) -> (&'static str, Option<&'static str>) {
    match scope {
        InstallScope::User if allow_elevation => ("lowest", Some("dialog")),
        InstallScope::User => ("lowest", None),
        InstallScope::Machine => ("admin", None),
    }
}

/// Escapes a value for a directive that expands constants.
pub fn escape_constants(value: &str) -> String {
    value.replace('{', "{{")
}

/// Escapes a value for a double-quoted parameter that expands constants.
pub fn iss_quote(value: &str) -> String {
    escape_constants(value).replace('"', "\"\"")
}

/// Encodes an argument of a `{cm:...}` constant.
pub fn cm_arg(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace(',', "%2c")
        .replace('}', "%7d")
        .replace('"', "\"\"")
}

/// Write file with UTF-8 BOM.
///
/// Inno Setup reads scripts without a BOM in the system code page.
pub async fn write_utf8_bom(path: &Path, content: &str) -> Result<()> {
    let mut file = tokio::fs::File::create(path)
        .await
        .fs_context("creating installer script", path)?;

    file.write_all(&[0xEF, 0xBB, 0xBF])
        .await
        .fs_context("writing UTF-8 BOM", path)?;
    file.write_all(content.as_bytes())
        .await
        .fs_context("writing installer script", path)?;
    file.flush()
        .await
        .fs_context("flushing installer script", path)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_id_is_stable_uuid_v5_of_identifier() {
        let settings = InstallerSettings::new("Python", "1.0.0", "python.org");
        assert_eq!(
            app_id(&settings).unwrap(),
            "886313E1-3B8A-5372-9B90-0C9AEE199E5D"
        );

        let next_release = InstallerSettings::new("Python", "2.0.0", "python.org");
        assert_eq!(app_id(&settings).unwrap(), app_id(&next_release).unwrap());
    }

    #[test]
    fn explicit_app_id_wins() {
        let mut settings = InstallerSettings::new("App", "1.0.0", "edu.example.app");
        settings.app_id = Some("{d3c1a2b4-0000-4000-8000-00000000abcd}".into());
        assert_eq!(
            app_id(&settings).unwrap(),
            "D3C1A2B4-0000-4000-8000-00000000ABCD"
        );

        settings.app_id = Some("not-a-guid".into());
        assert!(app_id(&settings).is_err());
    }

    #[test]
    fn formats_directives() {
        assert_eq!(format_app_id("ABC"), "{{ABC}");
        assert_eq!(
            version_info(&semver::Version::parse("1.4.2-beta.1").unwrap()),
            "1.4.2.0"
        );
        assert_eq!(map_compression(InnoCompression::default()), "lzma2");
        assert_eq!(privileges(InstallScope::User, true), ("lowest", Some("dialog")));
        assert_eq!(privileges(InstallScope::Machine, true), ("admin", None));
    }

    #[test]
    fn escapes_values() {
        assert_eq!(iss_quote(r#"My "Big" {App}"#), r#"My ""Big"" {{App}"#);
        assert_eq!(cm_arg("A, B}"), "A%2c B%7d");
    }

    #[tokio::test]
    async fn writes_bom() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("setup.iss");
        write_utf8_bom(&path, "[Setup]").await.unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..3], &[0xEF, 0xBB, 0xBF]);
        assert_eq!(&bytes[3..], b"[Setup]");
    }
}
