//! Error types for project operations

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using p5-core's error type
pub type Result<T> = std::result::Result<T, ProjectError>;

/// Category of a [`ProjectError`], used by the CLI to label failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    RegistryUnavailable,
    VersionNotFound,
    InvalidVersion,
    InvalidUrl,
    DownloadFailed,
    AssetMissing,
    ManifestMissing,
    ManifestInvalid,
    Prompt,
    Io,
}

impl ErrorKind {
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::RegistryUnavailable => "registry unavailable",
            ErrorKind::VersionNotFound => "version not found",
            ErrorKind::InvalidVersion => "invalid version",
            ErrorKind::InvalidUrl => "invalid URL",
            ErrorKind::DownloadFailed => "download failed",
            ErrorKind::AssetMissing => "asset missing",
            ErrorKind::ManifestMissing => "manifest missing",
            ErrorKind::ManifestInvalid => "manifest invalid",
            ErrorKind::Prompt => "prompt failed",
            ErrorKind::Io => "filesystem error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Hard failures of a project operation
#[derive(Error, Debug)]
pub enum ProjectError {
    /// The registry could not be queried
    #[error("Could not query the registry at {url}: {reason}")]
    RegistryUnavailable { url: String, reason: String },

    /// An exact version was requested that the registry does not know
    #[error("Cannot find version '{version}' of {package}")]
    VersionNotFound { package: String, version: String },

    /// A version string could not be parsed
    #[error("Invalid version '{input}': {reason}")]
    InvalidVersion { input: String, reason: String },

    /// A registry or releases base URL could not be parsed
    #[error("Invalid URL '{url}' (from {origin}): {reason}")]
    InvalidUrl {
        origin: String,
        url: String,
        reason: String,
    },

    /// An asset download did not succeed
    #[error("Failed to download {asset} (v{version}) from {url}: {reason}")]
    DownloadFailed {
        asset: String,
        version: String,
        url: String,
        reason: String,
    },

    /// The core asset is not present in the project directory
    #[error("Core asset {asset} not found in {}", dir.display())]
    AssetMissing { asset: String, dir: PathBuf },

    /// No manifest exists for the project
    #[error("No manifest found at {}", path.display())]
    ManifestMissing { path: PathBuf },

    /// The manifest exists but cannot be used
    #[error("Manifest {} is invalid: {reason}", path.display())]
    ManifestInvalid { path: PathBuf, reason: String },

    /// The interactive confirmation could not be read
    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ProjectError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProjectError::RegistryUnavailable { .. } => ErrorKind::RegistryUnavailable,
            ProjectError::VersionNotFound { .. } => ErrorKind::VersionNotFound,
            ProjectError::InvalidVersion { .. } => ErrorKind::InvalidVersion,
            ProjectError::InvalidUrl { .. } => ErrorKind::InvalidUrl,
            ProjectError::DownloadFailed { .. } => ErrorKind::DownloadFailed,
            ProjectError::AssetMissing { .. } => ErrorKind::AssetMissing,
            ProjectError::ManifestMissing { .. } => ErrorKind::ManifestMissing,
            ProjectError::ManifestInvalid { .. } => ErrorKind::ManifestInvalid,
            ProjectError::Prompt(_) => ErrorKind::Prompt,
            ProjectError::Io(_) => ErrorKind::Io,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        let err = ProjectError::VersionNotFound {
            package: "p5".to_string(),
            version: "9.9.9".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::VersionNotFound);
        assert_eq!(err.to_string(), "Cannot find version '9.9.9' of p5");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ProjectError = io.into();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(err.kind().to_string(), "filesystem error");
    }
}
