//! Charm-style CLI prompts using cliclack

use crate::assets::{AssetSource, ReleaseDownloader};
use crate::error::{ProjectError, Result};
use crate::library::LibraryProfile;
use crate::project::{project_dir, Confirm, ProjectReconciler};
use crate::registry::RegistryClient;
use crate::report::{Outcome, Report, Severity};
use crate::version::VersionSpec;
use async_trait::async_trait;
use semver::Version;
use std::path::Path;

/// Project operation requested on the command line
#[derive(Debug, Clone)]
pub enum Operation {
    Create {
        name: String,
        addons: bool,
        version: VersionSpec,
    },
    Upgrade {
        name: Option<String>,
        version: VersionSpec,
    },
    Clear {
        name: Option<String>,
    },
    Reinstate {
        name: Option<String>,
    },
}

impl Operation {
    /// Project name or path; `None` means the current directory
    pub fn name(&self) -> Option<&str> {
        match self {
            Operation::Create { name, .. } => Some(name.as_str()),
            Operation::Upgrade { name, .. }
            | Operation::Clear { name }
            | Operation::Reinstate { name } => name.as_deref(),
        }
    }
}

/// CLI arguments shared by all operations
#[derive(Debug, Clone)]
pub struct RunArgs {
    pub operation: Operation,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// Confirmation through an interactive cliclack prompt
#[derive(Debug, Clone, Copy, Default)]
pub struct CliConfirm {
    /// Answer yes without asking
    pub yes: bool,
}

impl Confirm for CliConfirm {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        if self.yes {
            cliclack::log::info(format!("{} yes (--yes)", prompt))?;
            return Ok(true);
        }
        cliclack::confirm(prompt)
            .initial_value(false)
            .interact()
            .map_err(|e| ProjectError::Prompt(e.to_string()))
    }
}

/// Announces each download before delegating to the wrapped source
struct AnnouncedAssets<A> {
    inner: A,
}

#[async_trait]
impl<A: AssetSource> AssetSource for AnnouncedAssets<A> {
    async fn fetch(&self, version: &Version, asset: &str) -> Result<Vec<u8>> {
        cliclack::log::step(format!("Downloading {} (v{})", asset, version))?;
        self.inner.fetch(version, asset).await
    }
}

/// Run one operation with interactive prompts and print its report
pub async fn run<P: LibraryProfile>(profile: &P, args: RunArgs) -> Result<Report> {
    cliclack::intro(profile.display_name())?;

    let registry = RegistryClient::from_profile(profile)?;
    let assets = AnnouncedAssets {
        inner: ReleaseDownloader::from_profile(profile)?,
    };
    let reconciler = ProjectReconciler::new(profile, registry, assets);
    let confirm = CliConfirm { yes: args.yes };

    let current_dir = std::env::current_dir()?;
    let dir = project_dir(&current_dir, args.operation.name());

    let report = match &args.operation {
        Operation::Create {
            addons, version, ..
        } => {
            cliclack::log::info(format!("Creating project in {}", dir.display()))?;
            reconciler.create(&dir, *addons, version, &confirm).await?
        }
        Operation::Upgrade { version, .. } => {
            reconciler.upgrade(&dir, version, &confirm).await?
        }
        Operation::Clear { .. } => reconciler.clear(&dir).await?,
        Operation::Reinstate { .. } => reconciler.reinstate(&dir).await?,
    };

    for (severity, message) in report.messages(profile.display_name()) {
        emit(severity, &message)?;
    }

    match &report.outcome {
        Outcome::Created { dir, .. } => print_next_steps(profile, dir)?,
        _ => cliclack::outro("Done")?,
    }

    Ok(report)
}

fn emit(severity: Severity, message: &str) -> Result<()> {
    match severity {
        Severity::Info => cliclack::log::info(message)?,
        Severity::Success => cliclack::log::success(message)?,
        Severity::Warning => cliclack::log::warning(message)?,
        Severity::Error => cliclack::log::error(message)?,
    }
    Ok(())
}

fn print_next_steps<P: LibraryProfile>(profile: &P, project_dir: &Path) -> Result<()> {
    let steps = profile.next_steps(project_dir);

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Happy coding!")?;

    Ok(())
}
