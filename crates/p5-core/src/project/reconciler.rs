//! Create, upgrade, clear and reinstate projects
//!
//! Project state is never stored as such; every operation derives it from the
//! manifest and the assets present on disk, then picks the smallest action
//! that brings the directory to the requested version.
//!
//! Downloads always complete in memory before anything is written. A failed
//! fetch therefore leaves the directory exactly as it was, and a failed
//! `create` in a directory it made itself removes that directory again.

use super::inspect::{inspect, LocalAssetState};
use super::manifest::{ManifestStore, ProjectManifest};
use super::scaffold::FileWriter;
use super::{AssetKind, Confirm, ProjectLayout};
use crate::assets::AssetSource;
use crate::error::Result;
use crate::library::LibraryProfile;
use crate::registry::{Registry, ResolvedVersion, VersionResolver};
use crate::report::{Declined, Outcome, Report, Warning};
use crate::version::VersionSpec;
use semver::Version;
use std::cmp::Ordering;
use std::path::Path;

/// Drives project operations against a registry and an asset source
pub struct ProjectReconciler<R, A> {
    display_name: String,
    resolver: VersionResolver<R>,
    assets: A,
    layout: ProjectLayout,
    manifests: ManifestStore,
    writer: FileWriter,
}

impl<R: Registry, A: AssetSource> ProjectReconciler<R, A> {
    pub fn new<P: LibraryProfile>(profile: &P, registry: R, assets: A) -> Self {
        let layout = ProjectLayout::from_profile(profile);
        Self {
            display_name: profile.display_name().to_string(),
            resolver: VersionResolver::new(registry, profile.package()),
            assets,
            manifests: ManifestStore::new(&layout.manifest_file),
            writer: FileWriter::new(layout.clone()),
            layout,
        }
    }

    pub fn manifests(&self) -> &ManifestStore {
        &self.manifests
    }

    /// Scaffold a new project in `dir` and download its assets
    pub async fn create(
        &self,
        dir: &Path,
        addons: bool,
        requested: &VersionSpec,
        confirm: &impl Confirm,
    ) -> Result<Report> {
        let mut warnings = Vec::new();

        // Writing into an existing directory needs the user's consent
        let existed = dir.exists();
        if existed {
            warnings.push(Warning::DirectoryAlreadyExists {
                path: dir.to_path_buf(),
            });
            let prompt = format!(
                "Directory '{}' already exists. Continue anyway?",
                dir.display()
            );
            if !confirm.confirm(&prompt)? {
                return Ok(Report::new(
                    Outcome::Cancelled(Declined::ExistingDirectory),
                    warnings,
                ));
            }
        }

        // Resolve and download before touching the filesystem
        let resolved = self.resolver.resolve(requested).await?;
        let downloads = self.download(&resolved.version, addons).await?;

        let created = if existed {
            None
        } else {
            self.writer.create_dir(dir).await?
        };

        if let Err(err) = self.populate(dir, &resolved, addons, &downloads).await {
            // Undo only what this run created, parents included
            if let Some(created) = created {
                if let Err(cleanup) = self.writer.remove_dir(&created).await {
                    tracing::warn!(dir = %created.display(), error = %cleanup, "could not remove partial project");
                }
            }
            return Err(err);
        }

        Ok(Report::new(
            Outcome::Created {
                dir: dir.to_path_buf(),
                version: resolved.version,
                addons,
            },
            warnings,
        ))
    }

    async fn populate(
        &self,
        dir: &Path,
        resolved: &ResolvedVersion,
        addons: bool,
        downloads: &[(AssetKind, Vec<u8>)],
    ) -> Result<()> {
        self.writer.write_scaffold(dir, addons).await?;
        self.manifests
            .write(
                dir,
                &ProjectManifest {
                    version: resolved.version.clone(),
                    addons,
                },
            )
            .await?;
        self.write_downloads(dir, downloads).await
    }

    /// Move the assets in `dir` to the requested version
    ///
    /// The manifest is left alone; it keeps recording the version the project
    /// was created with.
    pub async fn upgrade(
        &self,
        dir: &Path,
        requested: &VersionSpec,
        confirm: &impl Confirm,
    ) -> Result<Report> {
        // Installed version comes from the core asset header, not the manifest
        let state = inspect(dir, &self.layout).await?;
        let warnings = self.unreadable_warnings(&state);

        let resolved = self.resolver.resolve(requested).await?;
        let current = state.core_version.effective();
        let target = resolved.version.clone();
        let addons = state.addons_present();

        let outcome = match current.cmp(&target) {
            // Already there, nothing to download
            Ordering::Equal => {
                return Ok(Report::new(
                    Outcome::AlreadyAtVersion {
                        version: target,
                        requested_latest: resolved.requested_latest,
                    },
                    warnings,
                ));
            }
            // Downgrades are opt-in
            Ordering::Greater => {
                let prompt = format!(
                    "{} v{} is newer than v{}. Downgrade?",
                    self.display_name, current, target
                );
                if !confirm.confirm(&prompt)? {
                    return Ok(Report::new(
                        Outcome::Cancelled(Declined::Downgrade),
                        warnings,
                    ));
                }
                Outcome::Downgraded {
                    from: current,
                    to: target.clone(),
                    addons,
                }
            }
            Ordering::Less => Outcome::Upgraded {
                from: current,
                to: target.clone(),
                requested_latest: resolved.requested_latest,
                addons,
            },
        };

        // Fetch every asset first so a failed addon download keeps the old core
        let downloads = self.download(&target, addons).await?;
        self.write_downloads(dir, &downloads).await?;

        Ok(Report::new(outcome, warnings))
    }

    /// Delete the downloaded assets of a manifest-tracked project
    pub async fn clear(&self, dir: &Path) -> Result<Report> {
        let manifest = self.manifests.read(dir).await?;

        let mut removed = Vec::new();
        let mut warnings = Vec::new();
        // The addon is only ours to delete when the manifest recorded it
        for kind in self.layout.assets(manifest.addons) {
            let asset = self.layout.asset_name(kind).to_string();
            if self.writer.remove_asset(dir, kind).await? {
                removed.push(asset);
            } else {
                warnings.push(Warning::AssetAbsent { asset });
            }
        }

        Ok(Report::new(Outcome::Cleared { removed }, warnings))
    }

    /// Download the assets recorded in the manifest again
    pub async fn reinstate(&self, dir: &Path) -> Result<Report> {
        let manifest = self.manifests.read(dir).await?;

        let downloads = self.download(&manifest.version, manifest.addons).await?;
        self.write_downloads(dir, &downloads).await?;

        Ok(Report::new(
            Outcome::Reinstated {
                version: manifest.version,
                addons: manifest.addons,
            },
            Vec::new(),
        ))
    }

    async fn download(&self, version: &Version, addons: bool) -> Result<Vec<(AssetKind, Vec<u8>)>> {
        let mut downloads = Vec::new();
        for kind in self.layout.assets(addons) {
            let bytes = self
                .assets
                .fetch(version, self.layout.asset_name(kind))
                .await?;
            downloads.push((kind, bytes));
        }
        Ok(downloads)
    }

    async fn write_downloads(&self, dir: &Path, downloads: &[(AssetKind, Vec<u8>)]) -> Result<()> {
        for (kind, bytes) in downloads {
            self.writer.write_asset(dir, *kind, bytes).await?;
        }
        Ok(())
    }

    fn unreadable_warnings(&self, state: &LocalAssetState) -> Vec<Warning> {
        state
            .unreadable()
            .into_iter()
            .map(|kind| Warning::VersionUnreadable {
                asset: self.layout.asset_name(kind).to_string(),
                kind,
                assumed: crate::version::FALLBACK_VERSION,
            })
            .collect()
    }
}
