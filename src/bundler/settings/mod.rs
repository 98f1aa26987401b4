//! Configuration structures for the packaging pipeline.
//!
//! The environment and bundle settings come from `bundle.toml`, the installer
//! descriptor from `installer.toml`. [`SettingsBuilder`] combines them with the
//! project directory into the [`Settings`] every stage reads from.

mod builder;
mod bundle;
mod core;
mod environment;
mod installer;

pub use builder::SettingsBuilder;
pub use bundle::{BundleSettings, DataFile};
pub use core::Settings;
pub use environment::EnvironmentSettings;
pub use installer::{InnoCompression, InstallScope, InstallerSettings};

pub(crate) fn default_true() -> bool {
    true
}
