//! Project manifest persistence
//!
//! The manifest pins the concrete version a project was created with and
//! whether addons were requested:
//!
//! ```toml
//! [package]
//! version = "1.8.0"
//! addons = false
//! ```

use crate::error::{ProjectError, Result};
use crate::version::parse_version;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Pinned version and addon flag of a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectManifest {
    pub version: Version,
    pub addons: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct ManifestFile {
    package: PackageSection,
}

#[derive(Debug, Serialize, Deserialize)]
struct PackageSection {
    version: String,
    #[serde(default)]
    addons: bool,
}

impl ProjectManifest {
    fn to_toml(&self) -> Result<String> {
        let file = ManifestFile {
            package: PackageSection {
                version: self.version.to_string(),
                addons: self.addons,
            },
        };
        toml::to_string(&file).map_err(|e| {
            ProjectError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }

    fn from_toml(content: &str, path: &Path) -> Result<Self> {
        let invalid = |reason: String| ProjectError::ManifestInvalid {
            path: path.to_path_buf(),
            reason,
        };

        let file: ManifestFile = toml::from_str(content).map_err(|e| invalid(e.to_string()))?;
        let version = parse_version(&file.package.version).map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            version,
            addons: file.package.addons,
        })
    }
}

/// Reads and writes the manifest at a project root
#[derive(Debug, Clone)]
pub struct ManifestStore {
    file_name: String,
}

impl ManifestStore {
    pub fn new(file_name: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
        }
    }

    pub fn path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.file_name)
    }

    /// Read the manifest, failing with `ManifestMissing` when there is none
    pub async fn read(&self, dir: &Path) -> Result<ProjectManifest> {
        let path = self.path(dir);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ProjectError::ManifestMissing { path });
            }
            Err(e) => return Err(e.into()),
        };
        ProjectManifest::from_toml(&content, &path)
    }

    /// Write the manifest, replacing any existing one
    pub async fn write(&self, dir: &Path, manifest: &ProjectManifest) -> Result<()> {
        let path = self.path(dir);
        tracing::debug!(path = %path.display(), version = %manifest.version, "writing manifest");
        fs::write(&path, manifest.to_toml()?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let store = ManifestStore::new("p5.toml");
        let manifest = ProjectManifest {
            version: Version::new(1, 8, 0),
            addons: true,
        };

        store.write(dir.path(), &manifest).await.unwrap();
        assert!(store.path(dir.path()).is_file());
        assert_eq!(store.read(dir.path()).await.unwrap(), manifest);
    }

    #[tokio::test]
    async fn test_written_format() {
        let dir = TempDir::new().unwrap();
        let store = ManifestStore::new("p5.toml");
        let manifest = ProjectManifest {
            version: Version::new(1, 8, 0),
            addons: false,
        };
        store.write(dir.path(), &manifest).await.unwrap();

        let content = std::fs::read_to_string(dir.path().join("p5.toml")).unwrap();
        assert!(content.contains("[package]"));
        assert!(content.contains("version = \"1.8.0\""));
        assert!(content.contains("addons = false"));
    }

    #[tokio::test]
    async fn test_overwrites_existing() {
        let dir = TempDir::new().unwrap();
        let store = ManifestStore::new("p5.toml");
        let old = ProjectManifest {
            version: Version::new(1, 6, 0),
            addons: true,
        };
        let new = ProjectManifest {
            version: Version::new(1, 9, 2),
            addons: false,
        };
        store.write(dir.path(), &old).await.unwrap();
        store.write(dir.path(), &new).await.unwrap();
        assert_eq!(store.read(dir.path()).await.unwrap(), new);
    }

    #[tokio::test]
    async fn test_missing_manifest() {
        let dir = TempDir::new().unwrap();
        let store = ManifestStore::new("p5.toml");
        let err = store.read(dir.path()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ManifestMissing);
    }

    #[tokio::test]
    async fn test_addons_default_to_false() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("p5.toml"), "[package]\nversion = \"1.7.0\"\n").unwrap();
        let manifest = ManifestStore::new("p5.toml").read(dir.path()).await.unwrap();
        assert_eq!(manifest.version, Version::new(1, 7, 0));
        assert!(!manifest.addons);
    }

    #[tokio::test]
    async fn test_rejects_unpinned_version() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("p5.toml"),
            "[package]\nversion = \"LATEST\"\naddons = false\n",
        )
        .unwrap();
        let err = ManifestStore::new("p5.toml")
            .read(dir.path())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ManifestInvalid);
    }

    #[tokio::test]
    async fn test_rejects_malformed_toml() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("p5.toml"), "version = ").unwrap();
        let err = ManifestStore::new("p5.toml")
            .read(dir.path())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ManifestInvalid);
    }
}
