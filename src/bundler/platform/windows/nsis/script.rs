//! NSIS installer script generation.
//!
//! Renders the NSI template from an [`InstallerSpec`] using Handlebars and
//! writes it with the UTF-8 BOM NSIS expects.

use super::{
    InstallerSpec,
    template::NSI_TEMPLATE,
    utils::{install_subdir, nsis_escape, write_utf8_bom},
};
use crate::bundler::{
    compiler::pad_version,
    error::{Error, Result},
};
use handlebars::Handlebars;
use serde::Serialize;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

/// Registry key that starts programs at login.
const RUN_KEY: &str = r"Software\Microsoft\Windows\CurrentVersion\Run";

/// Parent key for Add/Remove Programs entries.
const UNINSTALL_ROOT: &str = r"Software\Microsoft\Windows\CurrentVersion\Uninstall";

#[derive(Serialize)]
struct ScriptData {
    app_name: String,
    version: String,
    version_windows: String,
    description: String,
    publisher: String,
    license: String,
    url: String,
    icon: Option<String>,
    install_dir: String,
    main_executable: String,
    uninstaller: String,
    shortcut_dir: String,
    shortcut: String,
    uninstall_key: String,
    run_key: &'static str,
    run_at_startup: bool,
    file_groups: Vec<FileGroup>,
}

/// Files installed into one directory.
#[derive(Serialize)]
struct FileGroup {
    out_path: String,
    files: Vec<String>,
}

/// Renders the NSI script for `spec`.
pub fn render_nsi_script(spec: &InstallerSpec) -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);

    let app_name = nsis_escape(&spec.app_name);
    let main_relative = spec
        .main_executable
        .strip_prefix(&spec.source_dir)
        .map_err(|_| {
            Error::GenericError(format!(
                "main executable {} is outside the distribution tree {}",
                spec.main_executable.display(),
                spec.source_dir.display()
            ))
        })?;

    let shortcut_dir = format!("$SMPROGRAMS\\{}", app_name);

    let data = ScriptData {
        version: nsis_escape(&spec.version),
        version_windows: nsis_escape(&pad_version(&spec.version)),
        description: nsis_escape(&spec.description),
        publisher: nsis_escape(spec.publisher()),
        license: nsis_escape(&spec.license),
        url: nsis_escape(&spec.url),
        icon: spec
            .icon
            .as_ref()
            .map(|icon| nsis_escape(&icon.display().to_string())),
        install_dir: format!("$LOCALAPPDATA\\Programs\\{}", app_name),
        main_executable: install_subdir(main_relative),
        uninstaller: "$INSTDIR\\uninstall.exe".to_string(),
        shortcut: format!("{}\\{}.lnk", shortcut_dir, app_name),
        shortcut_dir,
        uninstall_key: format!("{}\\{}", UNINSTALL_ROOT, app_name),
        run_key: RUN_KEY,
        run_at_startup: spec.run_at_startup,
        file_groups: group_files(&spec.source_dir, &spec.files)?,
        app_name,
    };

    handlebars
        .register_template_string("installer.nsi", NSI_TEMPLATE)
        .map_err(|e| Error::GenericError(format!("failed to register NSI template: {}", e)))?;

    handlebars
        .render("installer.nsi", &data)
        .map_err(|e| Error::GenericError(format!("failed to render NSI template: {}", e)))
}

/// Generates the NSI script for `spec` and writes it to `script_path`.
pub async fn generate_nsi_script(spec: &InstallerSpec, script_path: &Path) -> Result<PathBuf> {
    let content = render_nsi_script(spec)?;
    write_utf8_bom(script_path, &content).await?;
    log::debug!("Wrote NSI script: {}", script_path.display());
    Ok(script_path.to_path_buf())
}

/// Groups manifest files by their directory relative to the tree root.
fn group_files(source_dir: &Path, files: &[PathBuf]) -> Result<Vec<FileGroup>> {
    let mut groups: BTreeMap<PathBuf, Vec<String>> = BTreeMap::new();

    for file in files {
        let relative = file.strip_prefix(source_dir)?;
        let dir = relative.parent().unwrap_or(Path::new("")).to_path_buf();
        groups
            .entry(dir)
            .or_default()
            .push(nsis_escape(&file.display().to_string()));
    }

    Ok(groups
        .into_iter()
        .map(|(dir, files)| FileGroup {
            out_path: install_subdir(&dir),
            files,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(run_at_startup: bool) -> InstallerSpec {
        let root = PathBuf::from("/build/dist/main.dist");
        InstallerSpec {
            app_name: "Foo".into(),
            version: "1.2".into(),
            author: "Jane \"JD\" Doe".into(),
            company_name: "Example Inc.".into(),
            description: "Does foo things".into(),
            license: "MIT".into(),
            url: "https://example.com".into(),
            icon: None,
            files: vec![
                root.join("Foo.exe"),
                root.join("python3.dll"),
                root.join("lib").join("certifi").join("cacert.pem"),
            ],
            main_executable: root.join("Foo.exe"),
            source_dir: root,
            run_at_startup,
            output_path: PathBuf::from("/build/dist/Foo-1.2-setup.exe"),
        }
    }

    #[test]
    fn script_contains_metadata_and_files() {
        let script = render_nsi_script(&spec(false)).unwrap();

        assert!(script.contains(r#"Name "Foo""#));
        assert!(script.contains(r#"VIProductVersion "1.2.0.0""#));
        assert!(script.contains(r#"VIAddVersionKey "ProductVersion" "1.2""#));
        assert!(script.contains(r#"VIAddVersionKey "CompanyName" "Jane $\"JD$\" Doe""#));
        assert!(script.contains(r#"SetOutPath "$INSTDIR""#));
        assert!(script.contains(r#"SetOutPath "$INSTDIR\lib\certifi""#));
        assert!(script.contains(r#"File "/build/dist/main.dist/python3.dll""#));
        assert!(script.contains(r#"CreateShortcut "$SMPROGRAMS\Foo\Foo.lnk" "$INSTDIR\Foo.exe""#));
        assert!(script.contains(r#"OutFile "${OUTPUT_FILE}""#));
    }

    #[test]
    fn startup_registration_only_when_requested() {
        let without = render_nsi_script(&spec(false)).unwrap();
        assert!(!without.contains(RUN_KEY));

        let with = render_nsi_script(&spec(true)).unwrap();
        assert!(with.contains(&format!(
            r#"WriteRegStr HKCU "{}" "Foo" '"$INSTDIR\Foo.exe"'"#,
            RUN_KEY
        )));
        assert!(with.contains(&format!(r#"DeleteRegValue HKCU "{}" "Foo""#, RUN_KEY)));
    }

    #[test]
    fn icon_only_when_configured() {
        let without = render_nsi_script(&spec(false)).unwrap();
        assert!(!without.contains("Icon \""));

        let mut spec = spec(false);
        spec.icon = Some(PathBuf::from("/build/assets/foo.ico"));
        let with = render_nsi_script(&spec).unwrap();
        assert!(with.contains(r#"Icon "/build/assets/foo.ico""#));
        assert!(with.contains(r#"UninstallIcon "/build/assets/foo.ico""#));
    }

    #[test]
    fn main_executable_outside_tree_is_rejected() {
        let mut spec = spec(false);
        spec.main_executable = PathBuf::from("/elsewhere/Foo.exe");
        assert!(render_nsi_script(&spec).is_err());
    }
}
