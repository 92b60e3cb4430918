//! Project directories and the operations that reconcile them
//!
//! This module provides:
//! - The on-disk layout of a project (asset and manifest file names)
//! - Manifest persistence (ManifestStore)
//! - Local asset inspection (installed version, addon presence)
//! - Scaffold templates and file writes
//! - The reconciler driving create / upgrade / clear / reinstate

pub mod inspect;
pub mod manifest;
pub mod reconciler;
pub mod scaffold;

use crate::error::Result;
use crate::library::LibraryProfile;
use std::path::{Path, PathBuf};

pub use inspect::{inspect, DetectedVersion, LocalAssetState};
pub use manifest::{ManifestStore, ProjectManifest};
pub use reconciler::ProjectReconciler;
pub use scaffold::{FileWriter, ScaffoldFile};

/// Which downloaded asset a file is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Core,
    Addon,
}

/// File names that make up a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    pub core_asset: String,
    pub addon_asset: String,
    pub manifest_file: String,
}

impl ProjectLayout {
    pub fn from_profile<P: LibraryProfile>(profile: &P) -> Self {
        Self {
            core_asset: profile.core_asset().to_string(),
            addon_asset: profile.addon_asset().to_string(),
            manifest_file: profile.manifest_file().to_string(),
        }
    }

    pub fn asset_name(&self, kind: AssetKind) -> &str {
        match kind {
            AssetKind::Core => &self.core_asset,
            AssetKind::Addon => &self.addon_asset,
        }
    }

    pub fn asset_path(&self, dir: &Path, kind: AssetKind) -> PathBuf {
        dir.join(self.asset_name(kind))
    }

    /// Assets a project carries, core first
    pub fn assets(&self, addons: bool) -> Vec<AssetKind> {
        if addons {
            vec![AssetKind::Core, AssetKind::Addon]
        } else {
            vec![AssetKind::Core]
        }
    }
}

/// Resolve the project directory: `base/name`, or `base` itself when no name is given
pub fn project_dir(base: &Path, name: Option<&str>) -> PathBuf {
    match name {
        Some(name) if !name.is_empty() && name != "." => {
            let p = PathBuf::from(name);
            if p.is_absolute() {
                p
            } else {
                base.join(p)
            }
        }
        _ => base.to_path_buf(),
    }
}

/// Yes/no confirmation supplied by the caller
///
/// Operations ask before destructive or surprising steps (writing into an
/// existing directory, downgrading). Any `Fn(&str) -> bool` works, which keeps
/// scripted callers and tests free of terminal prompts.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> Result<bool> {
        Ok(self(prompt))
    }
}
