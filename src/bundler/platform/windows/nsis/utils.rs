//! NSIS utility functions.
//!
//! String escaping for NSIS scripts and BOM-prefixed script writing.

use crate::bundler::error::{ErrorExt, Result};
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Escapes a value for use inside a double-quoted NSIS string.
///
/// `$` starts a variable and `"` ends the string, so both are escaped.
/// Line breaks become NSIS escape sequences.
pub fn nsis_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '$' => escaped.push_str("$$"),
            '"' => escaped.push_str("$\\\""),
            '\n' => escaped.push_str("$\\n"),
            '\r' => escaped.push_str("$\\r"),
            '\t' => escaped.push_str("$\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Joins `$INSTDIR` with a relative directory using Windows separators.
pub fn install_subdir(relative_dir: &Path) -> String {
    let mut out = String::from("$INSTDIR");
    for component in relative_dir.components() {
        out.push('\\');
        out.push_str(&nsis_escape(&component.as_os_str().to_string_lossy()));
    }
    out
}

/// Write file with UTF-8 BOM (required by NSIS).
///
/// NSIS requires installer scripts to be encoded with UTF-8 BOM (byte order mark).
/// This function writes the BOM (EF BB BF) followed by the content.
pub async fn write_utf8_bom(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .fs_context("creating NSI script directory", parent)?;
    }

    let mut file = tokio::fs::File::create(path)
        .await
        .fs_context("creating NSI script file", path)?;

    // Write UTF-8 BOM: EF BB BF
    file.write_all(&[0xEF, 0xBB, 0xBF])
        .await
        .fs_context("writing UTF-8 BOM", path)?;
    file.write_all(content.as_bytes())
        .await
        .fs_context("writing NSI content", path)?;
    file.flush().await.fs_context("flushing NSI file", path)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn escapes_variables_and_quotes() {
        assert_eq!(nsis_escape(r#"Say "hi" for $5"#), r#"Say $\"hi$\" for $$5"#);
        assert_eq!(nsis_escape("plain"), "plain");
    }

    #[test]
    fn install_subdir_uses_backslashes() {
        let relative: PathBuf = ["lib", "certifi"].iter().collect();
        assert_eq!(install_subdir(&relative), r"$INSTDIR\lib\certifi");
        assert_eq!(install_subdir(Path::new("")), "$INSTDIR");
    }

    #[tokio::test]
    async fn script_starts_with_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/app.nsi");
        write_utf8_bom(&path, "Name \"Foo\"").await.unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..3], &[0xEF, 0xBB, 0xBF]);
        assert_eq!(&bytes[3..], b"Name \"Foo\"");
    }
}
