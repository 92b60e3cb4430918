//! Infer the installed library version from the assets on disk

use super::{AssetKind, ProjectLayout};
use crate::error::{ProjectError, Result};
use crate::version::{parse_version_marker, FALLBACK_VERSION};
use semver::Version;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Version read from an asset's header
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectedVersion {
    Known(Version),
    /// No `v<major>.<minor>.<patch>` marker on the first line
    Unknown,
}

impl DetectedVersion {
    /// The version to compare with; unknown markers count as [`FALLBACK_VERSION`]
    pub fn effective(&self) -> Version {
        match self {
            DetectedVersion::Known(v) => v.clone(),
            DetectedVersion::Unknown => FALLBACK_VERSION,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, DetectedVersion::Known(_))
    }
}

/// What the project directory currently holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalAssetState {
    pub core_version: DetectedVersion,
    /// `None` when the addon asset is absent
    pub addon_version: Option<DetectedVersion>,
}

impl LocalAssetState {
    pub fn addons_present(&self) -> bool {
        self.addon_version.is_some()
    }

    /// Assets whose marker could not be read
    pub fn unreadable(&self) -> Vec<AssetKind> {
        let mut kinds = Vec::new();
        if !self.core_version.is_known() {
            kinds.push(AssetKind::Core);
        }
        if matches!(self.addon_version, Some(DetectedVersion::Unknown)) {
            kinds.push(AssetKind::Addon);
        }
        kinds
    }
}

/// Inspect a project directory; the core asset must exist
pub async fn inspect(dir: &Path, layout: &ProjectLayout) -> Result<LocalAssetState> {
    let core_path = layout.asset_path(dir, AssetKind::Core);
    let core_version = match read_marker(&core_path).await? {
        Some(version) => version,
        None => {
            return Err(ProjectError::AssetMissing {
                asset: layout.core_asset.clone(),
                dir: dir.to_path_buf(),
            })
        }
    };

    let addon_version = read_marker(&layout.asset_path(dir, AssetKind::Addon)).await?;

    Ok(LocalAssetState {
        core_version,
        addon_version,
    })
}

/// Read the first line of `path`; `None` when the file does not exist
async fn read_marker(path: &Path) -> Result<Option<DetectedVersion>> {
    let file = match File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut first_line = Vec::new();
    BufReader::new(file)
        .read_until(b'\n', &mut first_line)
        .await?;

    let detected = match parse_version_marker(&first_line) {
        Some(version) => DetectedVersion::Known(version),
        None => DetectedVersion::Unknown,
    };
    tracing::debug!(path = %path.display(), ?detected, "read version marker");
    Ok(Some(detected))
}
