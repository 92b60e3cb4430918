//! Release asset downloads
//!
//! Assets are fetched whole into memory; callers decide when to write them so
//! that a failed download never leaves a half-updated project behind.

use crate::error::{ProjectError, Result};
use crate::http;
use crate::library::LibraryProfile;
use async_trait::async_trait;
use semver::Version;
use url::Url;

/// Source of versioned release assets
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Download `asset` as published for `version`
    async fn fetch(&self, version: &Version, asset: &str) -> Result<Vec<u8>>;
}

#[async_trait]
impl<T: AssetSource + ?Sized> AssetSource for &T {
    async fn fetch(&self, version: &Version, asset: &str) -> Result<Vec<u8>> {
        (**self).fetch(version, asset).await
    }
}

/// Downloads from `<base>/releases/download/v<version>/<asset>`
pub struct ReleaseDownloader {
    base: Url,
    client: reqwest::Client,
}

impl ReleaseDownloader {
    pub fn new(base: Url, user_agent: &str) -> Self {
        Self {
            base,
            client: http::client(user_agent),
        }
    }

    /// Create a downloader from a library profile, honoring the URL override env var
    pub fn from_profile<P: LibraryProfile>(profile: &P) -> Result<Self> {
        let base = http::base_url(profile.releases_url_env(), profile.default_releases_url())?;
        Ok(Self::new(base, profile.user_agent()))
    }

    pub fn asset_url(&self, version: &Version, asset: &str) -> std::result::Result<Url, String> {
        let tag = format!("v{}", version);
        http::build_url(&self.base, &["releases", "download", tag.as_str(), asset])
    }
}

#[async_trait]
impl AssetSource for ReleaseDownloader {
    async fn fetch(&self, version: &Version, asset: &str) -> Result<Vec<u8>> {
        let failed = |url: String, reason: String| ProjectError::DownloadFailed {
            asset: asset.to_string(),
            version: version.to_string(),
            url,
            reason,
        };

        let url = self
            .asset_url(version, asset)
            .map_err(|reason| failed(self.base.to_string(), reason))?;
        tracing::debug!(%url, "downloading asset");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| failed(url.to_string(), e.to_string()))?;

        if !response.status().is_success() {
            return Err(failed(url.to_string(), format!("HTTP {}", response.status())));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| failed(url.to_string(), e.to_string()))?;
        tracing::debug!(%url, size = bytes.len(), "downloaded asset");

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_url_layout() {
        let base = Url::parse("https://github.com/processing/p5.js").unwrap();
        let downloader = ReleaseDownloader::new(base, "p5-test");
        let url = downloader
            .asset_url(&Version::new(1, 9, 2), "p5.sound.min.js")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://github.com/processing/p5.js/releases/download/v1.9.2/p5.sound.min.js"
        );
    }
}
