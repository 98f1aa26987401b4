//! Inno Setup script template.
//!
//! Values that carry Inno constants (`{app}`, `{group}`, `{cm:...}`) next to
//! a placeholder are assembled in Rust and passed in whole.

pub const ISS_TEMPLATE: &str = r#"; Generated by planner_bundler for {{name}} {{version}}.
; Edit installer.toml instead; this file is rewritten on every build.

[Setup]
AppId={{app_id}}
AppName={{app_name}}
AppVersion={{version}}
AppVerName={{app_name}} {{version}}
{{#if publisher}}AppPublisher={{publisher}}
{{/if}}{{#if url}}AppPublisherURL={{url}}
AppSupportURL={{url}}
AppUpdatesURL={{url}}
{{/if}}DefaultDirName={{default_dir}}
DefaultGroupName={{app_name}}
DisableProgramGroupPage=yes
PrivilegesRequired={{privileges_required}}
{{#if privileges_overrides}}PrivilegesRequiredOverridesAllowed={{privileges_overrides}}
{{/if}}OutputDir={{output_dir}}
OutputBaseFilename={{output_base_filename}}
{{#if setup_icon}}SetupIconFile={{setup_icon}}
{{/if}}{{#if license_file}}LicenseFile={{license_file}}
{{/if}}UninstallDisplayIcon={{launcher_target}}
UninstallDisplayName={{app_name}}
Compression={{compression}}
SolidCompression={{solid_compression}}
WizardStyle=modern
ArchitecturesAllowed=x64compatible
ArchitecturesInstallIn64BitMode=x64compatible
VersionInfoVersion={{version_info}}
VersionInfoProductVersion={{version_info}}
VersionInfoProductName={{app_name}}
{{#if publisher}}VersionInfoCompany={{publisher}}
{{/if}}
[Languages]
Name: "english"; MessagesFile: "compiler:Default.isl"

{{#if desktop_shortcut}}[Tasks]
Name: "desktopicon"; Description: "{cm:CreateDesktopIcon}"; GroupDescription: "{cm:AdditionalIcons}"; Flags: unchecked

{{/if}}[Files]
Source: "{{bundle_source}}"; DestDir: "{app}"; Flags: ignoreversion recursesubdirs createallsubdirs

[Icons]
{{#if start_menu}}Name: "{{group_icon}}"; Filename: "{{launcher_target}}"
Name: "{{group_uninstall}}"; Filename: "{uninstallexe}"
{{/if}}{{#if desktop_shortcut}}Name: "{{desktop_icon}}"; Filename: "{{launcher_target}}"; Tasks: desktopicon
{{/if}}
{{#if launch_after_install}}[Run]
Filename: "{{launcher_target}}"; Description: "{{launch_description}}"; Flags: nowait postinstall skipifsilent

{{/if}}[UninstallDelete]
Type: filesandordirs; Name: "{app}"
"#;
