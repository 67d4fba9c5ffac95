//! Manifest version compatibility

use semver::Version;

/// Parse a version string, accepting a leading `v`
pub fn parse_version(version: &str) -> Option<Version> {
    let cleaned = version.trim();
    let cleaned = cleaned.strip_prefix('v').unwrap_or(cleaned);
    Version::parse(cleaned).ok()
}

/// Warn when the running tool is older than the version a manifest asks for.
///
/// Unparseable versions never produce a warning; an old tool is only ever a
/// warning, not a failure.
pub fn check_compatibility(
    tool_version: &str,
    required_version: &str,
    upgrade_command: &str,
) -> Option<String> {
    let tool = parse_version(tool_version)?;
    let required = parse_version(required_version)?;

    (tool < required).then(|| {
        format!(
            "This manifest was written for version {} or newer, you are running {}. \
             Consider updating: {}",
            required, tool, upgrade_command
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const UPGRADE: &str = "cargo install prompt-tools --force";

    #[test]
    fn test_tool_older_than_manifest() {
        let warning = check_compatibility("0.1.0", "0.2.0", UPGRADE).unwrap();
        assert!(warning.contains("0.2.0"));
        assert!(warning.contains(UPGRADE));
    }

    #[test]
    fn test_tool_same_or_newer() {
        assert!(check_compatibility("0.1.0", "0.1.0", UPGRADE).is_none());
        assert!(check_compatibility("0.3.1", "0.2.0", UPGRADE).is_none());
    }

    #[test]
    fn test_leading_v_is_accepted() {
        assert!(check_compatibility("v0.1.0", "v0.2.0", UPGRADE).is_some());
        assert_eq!(parse_version("v1.2.3"), Some(Version::new(1, 2, 3)));
    }

    #[test]
    fn test_invalid_versions_never_warn() {
        assert!(check_compatibility("invalid", "0.1.0", UPGRADE).is_none());
        assert!(check_compatibility("0.1.0", "latest", UPGRADE).is_none());
    }
}
