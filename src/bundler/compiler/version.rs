//! Version normalization for platform metadata.

/// Minimum number of components in a Windows product version.
pub const WINDOWS_VERSION_COMPONENTS: usize = 4;

/// Pads a dotted version with `0` components up to four.
///
/// Windows version resources need `major.minor.patch.build`. Shorter
/// versions are right-padded; longer ones are passed through untouched, as
/// are non-numeric components (the compiler rejects those itself).
///
/// - "1" -> "1.0.0.0"
/// - "1.2" -> "1.2.0.0"
/// - "1.2.3.4" -> "1.2.3.4"
/// - "1.2.3.4.5" -> "1.2.3.4.5"
pub fn pad_version(version: &str) -> String {
    let mut parts: Vec<&str> = version.split('.').collect();
    while parts.len() < WINDOWS_VERSION_COMPONENTS {
        parts.push("0");
    }
    parts.join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_short_versions_to_four_components() {
        for version in ["7", "1.2", "1.2.3", "1.2.3.4", "10.0.19041"] {
            let padded = pad_version(version);
            assert_eq!(padded.split('.').count(), 4, "{version} -> {padded}");
            assert!(padded.starts_with(version), "{version} -> {padded}");
        }
        assert_eq!(pad_version("1.2"), "1.2.0.0");
    }

    #[test]
    fn never_truncates() {
        assert_eq!(pad_version("1.2.3.4.5"), "1.2.3.4.5");
        assert_eq!(pad_version("1.2.3.4.5.6"), "1.2.3.4.5.6");
    }

    #[test]
    fn malformed_components_pass_through() {
        assert_eq!(pad_version("1.beta"), "1.beta.0.0");
        assert_eq!(pad_version("2024-rc"), "2024-rc.0.0.0");
    }
}
