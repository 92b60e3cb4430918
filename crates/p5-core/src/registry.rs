//! Registry lookups and version resolution
//!
//! The registry answers two questions: which version is the newest, and does
//! an exact version exist. [`VersionResolver`] turns a [`VersionSpec`] into a
//! concrete version using those answers.

use crate::error::{ProjectError, Result};
use crate::http;
use crate::library::LibraryProfile;
use crate::version::{parse_version, VersionSpec};
use async_trait::async_trait;
use reqwest::StatusCode;
use semver::Version;
use serde::Deserialize;
use url::Url;

/// Source of published versions
#[async_trait]
pub trait Registry: Send + Sync {
    /// Newest published version
    async fn latest_version(&self) -> Result<Version>;

    /// Whether an exact version was published
    async fn has_version(&self, version: &Version) -> Result<bool>;
}

#[async_trait]
impl<T: Registry + ?Sized> Registry for &T {
    async fn latest_version(&self) -> Result<Version> {
        (**self).latest_version().await
    }

    async fn has_version(&self, version: &Version) -> Result<bool> {
        (**self).has_version(version).await
    }
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    version: String,
}

/// npm-style registry client: `<base>/<package>/latest` and `<base>/<package>/<version>`
pub struct RegistryClient {
    base: Url,
    package: String,
    client: reqwest::Client,
}

impl RegistryClient {
    pub fn new(base: Url, package: &str, user_agent: &str) -> Self {
        Self {
            base,
            package: package.to_string(),
            client: http::client(user_agent),
        }
    }

    /// Create a client from a library profile, honoring the URL override env var
    pub fn from_profile<P: LibraryProfile>(profile: &P) -> Result<Self> {
        let base = http::base_url(profile.registry_url_env(), profile.default_registry_url())?;
        Ok(Self::new(base, profile.package(), profile.user_agent()))
    }

    fn url_for(&self, leaf: &str) -> Result<Url> {
        http::build_url(&self.base, &[self.package.as_str(), leaf]).map_err(|reason| {
            ProjectError::RegistryUnavailable {
                url: self.base.to_string(),
                reason,
            }
        })
    }

    fn unavailable(url: &Url, reason: impl ToString) -> ProjectError {
        ProjectError::RegistryUnavailable {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl Registry for RegistryClient {
    async fn latest_version(&self) -> Result<Version> {
        let url = self.url_for("latest")?;
        tracing::debug!(%url, "querying latest version");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Self::unavailable(&url, e))?;

        if !response.status().is_success() {
            return Err(Self::unavailable(&url, format!("HTTP {}", response.status())));
        }

        let body: LatestResponse = response
            .json()
            .await
            .map_err(|e| Self::unavailable(&url, format!("unexpected response ({})", e)))?;

        parse_version(&body.version).map_err(|e| Self::unavailable(&url, e))
    }

    async fn has_version(&self, version: &Version) -> Result<bool> {
        let url = self.url_for(&version.to_string())?;
        tracing::debug!(%url, "checking version exists");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Self::unavailable(&url, e))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(Self::unavailable(&url, format!("HTTP {}", status)));
        }
        Ok(status == StatusCode::OK)
    }
}

/// A concrete version plus whether it came from the `Latest` sentinel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    pub version: Version,
    pub requested_latest: bool,
}

/// Resolves requested versions against a registry
pub struct VersionResolver<R> {
    registry: R,
    package: String,
}

impl<R: Registry> VersionResolver<R> {
    pub fn new(registry: R, package: &str) -> Self {
        Self {
            registry,
            package: package.to_string(),
        }
    }

    pub async fn resolve_latest(&self) -> Result<Version> {
        self.registry.latest_version().await
    }

    /// Check that a requested version exists; `Latest` always does
    pub async fn validate(&self, spec: &VersionSpec) -> Result<bool> {
        match spec {
            VersionSpec::Latest => Ok(true),
            VersionSpec::Exact(version) => self.registry.has_version(version).await,
        }
    }

    /// Turn a request into a concrete, published version
    pub async fn resolve(&self, spec: &VersionSpec) -> Result<ResolvedVersion> {
        match spec {
            VersionSpec::Latest => Ok(ResolvedVersion {
                version: self.resolve_latest().await?,
                requested_latest: true,
            }),
            VersionSpec::Exact(version) => {
                if !self.validate(spec).await? {
                    return Err(ProjectError::VersionNotFound {
                        package: self.package.clone(),
                        version: version.to_string(),
                    });
                }
                Ok(ResolvedVersion {
                    version: version.clone(),
                    requested_latest: false,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    struct FixedRegistry {
        latest: Version,
        published: Vec<Version>,
    }

    #[async_trait]
    impl Registry for FixedRegistry {
        async fn latest_version(&self) -> Result<Version> {
            Ok(self.latest.clone())
        }

        async fn has_version(&self, version: &Version) -> Result<bool> {
            Ok(self.published.contains(version))
        }
    }

    struct DownRegistry;

    #[async_trait]
    impl Registry for DownRegistry {
        async fn latest_version(&self) -> Result<Version> {
            Err(ProjectError::RegistryUnavailable {
                url: "http://registry.invalid".to_string(),
                reason: "connection refused".to_string(),
            })
        }

        async fn has_version(&self, _version: &Version) -> Result<bool> {
            self.latest_version().await.map(|_| true)
        }
    }

    fn resolver() -> VersionResolver<FixedRegistry> {
        VersionResolver::new(
            FixedRegistry {
                latest: Version::new(1, 9, 2),
                published: vec![Version::new(1, 8, 0), Version::new(1, 9, 2)],
            },
            "p5",
        )
    }

    #[tokio::test]
    async fn test_resolve_latest_sentinel() {
        let resolved = resolver().resolve(&VersionSpec::Latest).await.unwrap();
        assert_eq!(resolved.version, Version::new(1, 9, 2));
        assert!(resolved.requested_latest);
    }

    #[tokio::test]
    async fn test_resolve_latest_is_stable() {
        let resolver = resolver();
        let first = resolver.resolve_latest().await.unwrap();
        let second = resolver.resolve_latest().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_validate_exact_versions() {
        let resolver = resolver();
        let published = VersionSpec::Exact(Version::new(1, 8, 0));
        let unknown = VersionSpec::Exact(Version::new(0, 0, 1));
        assert!(resolver.validate(&published).await.unwrap());
        assert!(!resolver.validate(&unknown).await.unwrap());
        assert!(resolver.validate(&VersionSpec::Latest).await.unwrap());
    }

    #[tokio::test]
    async fn test_resolve_unknown_version_is_not_found() {
        let err = resolver()
            .resolve(&VersionSpec::Exact(Version::new(7, 7, 7)))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::VersionNotFound);
        assert!(err.to_string().contains("7.7.7"));
    }

    #[tokio::test]
    async fn test_resolve_exact_keeps_request() {
        let resolved = resolver()
            .resolve(&VersionSpec::Exact(Version::new(1, 8, 0)))
            .await
            .unwrap();
        assert_eq!(resolved.version, Version::new(1, 8, 0));
        assert!(!resolved.requested_latest);
    }

    #[tokio::test]
    async fn test_unavailable_registry_propagates() {
        let resolver = VersionResolver::new(DownRegistry, "p5");
        let err = resolver.resolve(&VersionSpec::Latest).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RegistryUnavailable);
    }
}
