//! NSI script template.
//!
//! Rendered by handlebars with HTML escaping disabled; every value is
//! NSIS-escaped before rendering. `OUTPUT_FILE` is defined on the makensis
//! command line.

pub const NSI_TEMPLATE: &str = r#"Unicode true
ManifestDPIAware true
SetCompressor /SOLID lzma

!include "MUI2.nsh"

Name "{{app_name}}"
OutFile "${OUTPUT_FILE}"
InstallDir "{{install_dir}}"
InstallDirRegKey HKCU "{{uninstall_key}}" "InstallLocation"
RequestExecutionLevel user
{{#if icon}}
Icon "{{icon}}"
UninstallIcon "{{icon}}"
{{/if}}

VIProductVersion "{{version_windows}}"
VIAddVersionKey "ProductName" "{{app_name}}"
VIAddVersionKey "ProductVersion" "{{version}}"
VIAddVersionKey "FileVersion" "{{version}}"
VIAddVersionKey "FileDescription" "{{description}}"
VIAddVersionKey "CompanyName" "{{publisher}}"
VIAddVersionKey "LegalCopyright" "{{license}}"

!define MUI_FINISHPAGE_RUN "{{main_executable}}"

!insertmacro MUI_PAGE_DIRECTORY
!insertmacro MUI_PAGE_INSTFILES
!insertmacro MUI_PAGE_FINISH

!insertmacro MUI_UNPAGE_CONFIRM
!insertmacro MUI_UNPAGE_INSTFILES

!insertmacro MUI_LANGUAGE "English"

Section "Install"
{{#each file_groups}}
  SetOutPath "{{this.out_path}}"
{{#each this.files}}
  File "{{this}}"
{{/each}}
{{/each}}

  SetOutPath "$INSTDIR"
  WriteUninstaller "{{uninstaller}}"

  CreateDirectory "{{shortcut_dir}}"
  CreateShortcut "{{shortcut}}" "{{main_executable}}"

  WriteRegStr HKCU "{{uninstall_key}}" "DisplayName" "{{app_name}}"
  WriteRegStr HKCU "{{uninstall_key}}" "DisplayVersion" "{{version}}"
  WriteRegStr HKCU "{{uninstall_key}}" "Publisher" "{{publisher}}"
  WriteRegStr HKCU "{{uninstall_key}}" "URLInfoAbout" "{{url}}"
  WriteRegStr HKCU "{{uninstall_key}}" "DisplayIcon" "{{main_executable}}"
  WriteRegStr HKCU "{{uninstall_key}}" "InstallLocation" "$INSTDIR"
  WriteRegStr HKCU "{{uninstall_key}}" "UninstallString" '"{{uninstaller}}"'
{{#if run_at_startup}}

  WriteRegStr HKCU "{{run_key}}" "{{app_name}}" '"{{main_executable}}"'
{{/if}}
SectionEnd

Section "Uninstall"
{{#if run_at_startup}}
  DeleteRegValue HKCU "{{run_key}}" "{{app_name}}"
{{/if}}
  Delete "{{shortcut}}"
  RMDir "{{shortcut_dir}}"
  DeleteRegKey HKCU "{{uninstall_key}}"
  RMDir /r "$INSTDIR"
SectionEnd
"#;
