//! p5 Core - version resolution and project reconciliation for p5.js projects
//!
//! This library creates, upgrades, clears and reinstates local projects that
//! bundle a pinned release of a front-end library. It is driven by a CLI binary
//! that supplies a [`LibraryProfile`] describing the library.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Collaborators** - Registry lookups, release downloads, version markers
//! - **Layer 2: Reconciliation** - `ProjectReconciler` deciding and applying the minimal action
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! Operations return a [`Report`] instead of printing, and take a [`Confirm`]
//! capability instead of reading stdin, so they run unattended in tests.
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use p5_core::{ProjectReconciler, RegistryClient, ReleaseDownloader, VersionSpec};
//!
//! let registry = RegistryClient::from_profile(&MyLibrary)?;
//! let assets = ReleaseDownloader::from_profile(&MyLibrary)?;
//! let reconciler = ProjectReconciler::new(&MyLibrary, registry, assets);
//! let report = reconciler
//!     .create(Path::new("demo"), false, &VersionSpec::Latest, &|_: &str| true)
//!     .await?;
//! ```

pub mod assets;
pub mod error;
mod http;
pub mod library;
pub mod project;
pub mod registry;
pub mod report;
pub mod version;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use assets::{AssetSource, ReleaseDownloader};
pub use error::{ErrorKind, ProjectError};
pub use library::LibraryProfile;
pub use project::{Confirm, ProjectReconciler};
pub use registry::{Registry, RegistryClient, VersionResolver};
pub use report::{styled, Outcome, Report, Severity, Warning};
pub use version::VersionSpec;

#[cfg(feature = "tui")]
pub use tui::run;
