//! Tagged results of project operations and their user-facing rendering
//!
//! Operations never print. They return a [`Report`]; the CLI layer turns it
//! into `(Severity, message)` pairs and decides how to show them.

use crate::project::AssetKind;
use colored::Colorize;
use semver::Version;
use std::fmt;
use std::path::PathBuf;

/// How a message should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// Format a message for the terminal according to its severity
pub fn styled(severity: Severity, message: &str) -> String {
    match severity {
        Severity::Info => message.to_string(),
        Severity::Success => message.green().to_string(),
        Severity::Warning => format!("{} {}", "Warning:".yellow().bold(), message.yellow()),
        Severity::Error => format!("{} {}", "Error:".red().bold(), message.red()),
    }
}

/// Non-fatal conditions met while an operation ran
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// `create` targeted a directory that already existed
    DirectoryAlreadyExists { path: PathBuf },
    /// An asset carried no readable version marker
    VersionUnreadable {
        asset: String,
        kind: AssetKind,
        assumed: Version,
    },
    /// `clear` found nothing to delete for an asset
    AssetAbsent { asset: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::DirectoryAlreadyExists { path } => {
                write!(f, "Directory '{}' already exists", path.display())
            }
            Warning::VersionUnreadable { asset, assumed, .. } => write!(
                f,
                "Could not read the version of {}, assuming v{}",
                asset, assumed
            ),
            Warning::AssetAbsent { asset } => write!(f, "{} not found, nothing to remove", asset),
        }
    }
}

/// Which confirmation the user turned down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Declined {
    ExistingDirectory,
    Downgrade,
}

/// What an operation ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created {
        dir: PathBuf,
        version: Version,
        addons: bool,
    },
    AlreadyAtVersion {
        version: Version,
        requested_latest: bool,
    },
    Upgraded {
        from: Version,
        to: Version,
        requested_latest: bool,
        addons: bool,
    },
    Downgraded {
        from: Version,
        to: Version,
        addons: bool,
    },
    Cleared {
        removed: Vec<String>,
    },
    Reinstated {
        version: Version,
        addons: bool,
    },
    /// The user declined a confirmation; nothing was changed
    Cancelled(Declined),
}

/// Outcome plus warnings of a single operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub outcome: Outcome,
    pub warnings: Vec<Warning>,
}

impl Report {
    pub fn new(outcome: Outcome, warnings: Vec<Warning>) -> Self {
        Self { outcome, warnings }
    }

    /// Whether the operation wrote or removed any file
    pub fn changed_files(&self) -> bool {
        match &self.outcome {
            Outcome::AlreadyAtVersion { .. } | Outcome::Cancelled(_) => false,
            Outcome::Cleared { removed } => !removed.is_empty(),
            _ => true,
        }
    }

    /// Warnings first, then the outcome line
    pub fn messages(&self, library: &str) -> Vec<(Severity, String)> {
        let mut messages: Vec<(Severity, String)> = self
            .warnings
            .iter()
            .map(|w| (Severity::Warning, w.to_string()))
            .collect();
        messages.push(self.outcome_message(library));
        messages
    }

    fn outcome_message(&self, library: &str) -> (Severity, String) {
        let with_addons = |addons: &bool| if *addons { " with addons" } else { "" };

        match &self.outcome {
            Outcome::Created {
                dir,
                version,
                addons,
            } => (
                Severity::Success,
                format!(
                    "Created {} using {} v{}{}",
                    dir.display(),
                    library,
                    version,
                    with_addons(addons)
                ),
            ),
            Outcome::AlreadyAtVersion {
                version,
                requested_latest,
            } => {
                let which = if *requested_latest { "latest" } else { "desired" };
                (
                    Severity::Info,
                    format!("{} is already at the {} version (v{})", library, which, version),
                )
            }
            Outcome::Upgraded {
                from,
                to,
                requested_latest,
                addons,
            } => {
                let latest = if *requested_latest { " (latest)" } else { "" };
                (
                    Severity::Success,
                    format!(
                        "Upgraded {} from v{} to v{}{}{}",
                        library,
                        from,
                        to,
                        latest,
                        with_addons(addons)
                    ),
                )
            }
            Outcome::Downgraded { from, to, addons } => (
                Severity::Success,
                format!(
                    "Downgraded {} from v{} to v{}{}",
                    library,
                    from,
                    to,
                    with_addons(addons)
                ),
            ),
            Outcome::Cleared { removed } if removed.is_empty() => {
                (Severity::Info, "No assets to remove".to_string())
            }
            Outcome::Cleared { removed } => {
                (Severity::Success, format!("Removed {}", removed.join(", ")))
            }
            Outcome::Reinstated { version, addons } => (
                Severity::Success,
                format!(
                    "Reinstated {} v{}{}",
                    library,
                    version,
                    with_addons(addons)
                ),
            ),
            Outcome::Cancelled(Declined::ExistingDirectory) => (
                Severity::Info,
                "Cancelled, the existing directory was left untouched".to_string(),
            ),
            Outcome::Cancelled(Declined::Downgrade) => (
                Severity::Info,
                "Downgrade cancelled, assets were left untouched".to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_styled_keeps_message() {
        colored::control::set_override(false);
        assert_eq!(styled(Severity::Info, "hello"), "hello");
        assert_eq!(styled(Severity::Warning, "careful"), "Warning: careful");
        assert_eq!(styled(Severity::Error, "boom"), "Error: boom");
        assert_eq!(styled(Severity::Success, "done"), "done");
    }

    #[test]
    fn test_already_at_version_phrasing() {
        let latest = Report::new(
            Outcome::AlreadyAtVersion {
                version: Version::new(1, 9, 2),
                requested_latest: true,
            },
            vec![],
        );
        let desired = Report::new(
            Outcome::AlreadyAtVersion {
                version: Version::new(1, 8, 0),
                requested_latest: false,
            },
            vec![],
        );

        assert_eq!(
            latest.messages("p5.js"),
            vec![(
                Severity::Info,
                "p5.js is already at the latest version (v1.9.2)".to_string()
            )]
        );
        assert!(desired.messages("p5.js")[0].1.contains("desired version"));
        assert!(!latest.changed_files());
    }

    #[test]
    fn test_warnings_come_first() {
        let report = Report::new(
            Outcome::Cleared {
                removed: vec!["p5.min.js".to_string()],
            },
            vec![Warning::AssetAbsent {
                asset: "p5.sound.min.js".to_string(),
            }],
        );
        let messages = report.messages("p5.js");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].0, Severity::Warning);
        assert_eq!(messages[0].1, "p5.sound.min.js not found, nothing to remove");
        assert_eq!(messages[1], (Severity::Success, "Removed p5.min.js".to_string()));
        assert!(report.changed_files());
    }

    #[test]
    fn test_unreadable_warning_text() {
        let warning = Warning::VersionUnreadable {
            asset: "p5.min.js".to_string(),
            kind: AssetKind::Core,
            assumed: Version::new(1, 0, 0),
        };
        assert_eq!(
            warning.to_string(),
            "Could not read the version of p5.min.js, assuming v1.0.0"
        );
    }
}
