//! Library profile trait for CLI binaries
//!
//! This trait defines the interface a binary implements to describe the
//! front-end library it bundles: where versions are looked up, where release
//! assets are downloaded from, and which files make up a project.

use std::path::Path;

/// Configuration trait for a bundled front-end library
///
/// Each binary implements this trait to define:
/// - Library identity (registry package name, display name)
/// - Registry and release download URLs (with env overrides)
/// - Asset and manifest file names
/// - Post-create instructions
pub trait LibraryProfile: Clone + Send + Sync + 'static {
    /// Package name in the registry (e.g. `p5`)
    fn package(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Default registry base URL; the package name is appended as a path segment
    fn default_registry_url(&self) -> &'static str;

    /// Environment variable name for overriding the registry URL
    fn registry_url_env(&self) -> &'static str;

    /// Default releases base URL; `releases/download/v<version>/<asset>` is appended
    fn default_releases_url(&self) -> &'static str;

    /// Environment variable name for overriding the releases URL
    fn releases_url_env(&self) -> &'static str;

    /// File name of the core asset every project needs
    fn core_asset(&self) -> &'static str;

    /// File name of the optional addon asset
    fn addon_asset(&self) -> &'static str;

    /// File name of the project manifest
    fn manifest_file(&self) -> &'static str;

    /// Generate the "next steps" instructions after project creation
    fn next_steps(&self, dir: &Path) -> Vec<String>;

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.package()
    }
}
