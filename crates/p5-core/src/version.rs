//! Requested versions and version markers embedded in downloaded assets

use crate::error::ProjectError;
use regex::Regex;
use semver::Version;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Version assumed for an asset whose marker cannot be read
pub const FALLBACK_VERSION: Version = Version::new(1, 0, 0);

/// Keyword accepted on the command line for the newest published version
pub const LATEST_KEYWORD: &str = "LATEST";

/// `v<major>.<minor>.<patch>` with an optional pre-release suffix (`v2.0.0-beta.8`)
static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bv(\d+\.\d+\.\d+(?:-[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*)?)\b")
        .expect("marker pattern is valid")
});

/// A version as requested by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VersionSpec {
    /// Newest published version, resolved against the registry before use
    #[default]
    Latest,
    Exact(Version),
}

impl FromStr for VersionSpec {
    type Err = ProjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case(LATEST_KEYWORD) {
            return Ok(VersionSpec::Latest);
        }
        parse_version(trimmed).map(VersionSpec::Exact)
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSpec::Latest => f.write_str(LATEST_KEYWORD),
            VersionSpec::Exact(v) => write!(f, "{}", v),
        }
    }
}

/// Parse version string, handling a leading `v`
///
/// Pre-release versions are accepted; build metadata is not, since release
/// tags and asset headers never carry it.
pub fn parse_version(version_str: &str) -> Result<Version, ProjectError> {
    let invalid = |reason: String| ProjectError::InvalidVersion {
        input: version_str.to_string(),
        reason,
    };

    let cleaned = version_str.strip_prefix('v').unwrap_or(version_str);
    let version = Version::parse(cleaned).map_err(|e| invalid(e.to_string()))?;
    if !version.build.is_empty() {
        return Err(invalid(format!(
            "build metadata '+{}' is not supported",
            version.build
        )));
    }
    Ok(version)
}

/// Extract the version marker from the first line of an asset
///
/// Returns `None` when the first line carries no marker; callers substitute
/// [`FALLBACK_VERSION`] and warn.
pub fn parse_version_marker(content: &[u8]) -> Option<Version> {
    let first_line = content.split(|b| *b == b'\n').next().unwrap_or(content);
    let line = String::from_utf8_lossy(first_line);
    let caps = MARKER.captures(&line)?;

    Version::parse(&caps[1]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_latest_keyword() {
        assert_eq!("LATEST".parse::<VersionSpec>().unwrap(), VersionSpec::Latest);
        assert_eq!("latest".parse::<VersionSpec>().unwrap(), VersionSpec::Latest);
    }

    #[test]
    fn test_parse_exact_version() {
        let spec: VersionSpec = "1.8.0".parse().unwrap();
        assert_eq!(spec, VersionSpec::Exact(Version::new(1, 8, 0)));

        let prefixed: VersionSpec = "v1.9.2".parse().unwrap();
        assert_eq!(prefixed, VersionSpec::Exact(Version::new(1, 9, 2)));
    }

    #[test]
    fn test_parse_prerelease_keeps_suffix() {
        let spec: VersionSpec = "2.0.0-beta.8".parse().unwrap();
        assert_eq!(
            spec,
            VersionSpec::Exact(Version::parse("2.0.0-beta.8").unwrap())
        );
    }

    #[test]
    fn test_parse_rejects_build_metadata() {
        let err = parse_version("1.9.2+nightly").unwrap_err();
        assert!(err.to_string().contains("build metadata"));
    }

    #[test]
    fn test_parse_rejects_ranges() {
        assert!("^1.8".parse::<VersionSpec>().is_err());
        assert!("1.x".parse::<VersionSpec>().is_err());
        assert!("".parse::<VersionSpec>().is_err());
    }

    #[test]
    fn test_display_round_trips_keyword() {
        assert_eq!(VersionSpec::Latest.to_string(), "LATEST");
        assert_eq!(
            VersionSpec::Exact(Version::new(1, 6, 0)).to_string(),
            "1.6.0"
        );
    }

    #[test]
    fn test_marker_from_minified_header() {
        let content = b"/*! p5.js v1.9.2 February 12, 2024 */\n!function(e){}";
        assert_eq!(parse_version_marker(content), Some(Version::new(1, 9, 2)));
    }

    #[test]
    fn test_marker_keeps_prerelease() {
        let content = b"/*! p5.js v2.0.0-beta.8 April 10, 2025 */\n";
        assert_eq!(
            parse_version_marker(content),
            Some(Version::parse("2.0.0-beta.8").unwrap())
        );
        assert!(parse_version_marker(content).unwrap() < Version::new(2, 0, 0));
    }

    #[test]
    fn test_marker_stops_at_trailing_punctuation() {
        assert_eq!(
            parse_version_marker(b"// p5.js v1.9.2."),
            Some(Version::new(1, 9, 2))
        );
    }

    #[test]
    fn test_marker_absent_from_sound_header() {
        // p5.sound spells its version without the `v` prefix
        let content = b"/** [p5.sound]  Version: 1.0.1 - 2021-05-25 */\n";
        assert_eq!(parse_version_marker(content), None);
    }

    #[test]
    fn test_marker_only_reads_first_line() {
        let content = b"/* no marker here */\n/*! p5.js v1.9.2 */";
        assert_eq!(parse_version_marker(content), None);
    }

    #[test]
    fn test_marker_missing_or_garbage() {
        assert_eq!(parse_version_marker(b""), None);
        assert_eq!(parse_version_marker(b"var x = 1;"), None);
        assert_eq!(parse_version_marker(&[0xff, 0xfe, 0x00, b'\n']), None);
        assert_eq!(parse_version_marker(b"/*! p5.js v1.9 */"), None);
    }

    #[test]
    fn test_marker_ignores_embedded_identifiers() {
        assert_eq!(parse_version_marker(b"dev1.2.3"), None);
    }
}
