//! p5 CLI - create and maintain p5.js projects

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use p5_core::tui::{Operation, RunArgs};
use p5_core::{styled, LibraryProfile, Severity, VersionSpec};
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// p5.js library profile
#[derive(Clone)]
pub struct P5Library;

impl LibraryProfile for P5Library {
    fn package(&self) -> &'static str {
        "p5"
    }

    fn display_name(&self) -> &'static str {
        "p5.js"
    }

    fn default_registry_url(&self) -> &'static str {
        "https://registry.npmjs.org"
    }

    fn registry_url_env(&self) -> &'static str {
        "P5_REGISTRY_URL"
    }

    fn default_releases_url(&self) -> &'static str {
        "https://github.com/processing/p5.js"
    }

    fn releases_url_env(&self) -> &'static str {
        "P5_RELEASES_URL"
    }

    fn core_asset(&self) -> &'static str {
        "p5.min.js"
    }

    fn addon_asset(&self) -> &'static str {
        "p5.sound.min.js"
    }

    fn manifest_file(&self) -> &'static str {
        "p5.toml"
    }

    fn user_agent(&self) -> &'static str {
        concat!("p5-tools/", env!("CARGO_PKG_VERSION"))
    }

    fn next_steps(&self, dir: &Path) -> Vec<String> {
        let mut steps = Vec::new();
        let current = std::env::current_dir().ok();

        if current.as_deref() != Some(dir) {
            steps.push(format!("cd {}", dir.display()));
        }

        steps.push("Open index.html in a browser".to_string());
        steps.push("Edit sketch.js to start drawing".to_string());

        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "p5")]
#[command(about = "CLI for creating and maintaining p5.js projects")]
#[command(disable_version_flag = true)]
pub struct Args {
    /// Print version
    #[arg(short = 'v', long = "version")]
    pub version: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new p5.js project
    Create(CreateArgs),
    /// Upgrade (or downgrade) the p5.js files of a project
    Upgrade(UpgradeArgs),
    /// Remove the downloaded p5.js files, keeping the manifest
    Clear(ProjectArgs),
    /// Download the p5.js files recorded in the manifest again
    Reinstate(ProjectArgs),
}

#[derive(Parser, Debug)]
pub struct CreateArgs {
    /// Name of the project directory
    pub name: String,

    /// Include the p5.sound addon
    #[arg(long)]
    pub addons: bool,

    /// Version of p5.js to download (e.g. 1.9.2, or LATEST)
    #[arg(long, default_value = "LATEST")]
    pub version: VersionSpec,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Parser, Debug)]
pub struct UpgradeArgs {
    /// Project directory (defaults to the current directory)
    pub name: Option<String>,

    /// Version of p5.js to move to (e.g. 1.9.2, or LATEST)
    #[arg(long, default_value = "LATEST")]
    pub version: VersionSpec,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Parser, Debug)]
pub struct ProjectArgs {
    /// Project directory (defaults to the current directory)
    pub name: Option<String>,
}

impl From<Command> for RunArgs {
    fn from(command: Command) -> Self {
        match command {
            Command::Create(args) => RunArgs {
                operation: Operation::Create {
                    name: args.name,
                    addons: args.addons,
                    version: args.version,
                },
                yes: args.yes,
            },
            Command::Upgrade(args) => RunArgs {
                operation: Operation::Upgrade {
                    name: args.name,
                    version: args.version,
                },
                yes: args.yes,
            },
            Command::Clear(args) => RunArgs {
                operation: Operation::Clear { name: args.name },
                yes: false,
            },
            Command::Reinstate(args) => RunArgs {
                operation: Operation::Reinstate { name: args.name },
                yes: false,
            },
        }
    }
}

/// Initialize tracing on stderr; quiet unless RUST_LOG asks for more
fn init_tracing() -> Result<()> {
    let directives = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into());
    let filter = tracing_subscriber::EnvFilter::try_new(&directives)
        .with_context(|| format!("Invalid RUST_LOG directives: {}", directives))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();

    if args.version {
        println!("p5 {}", CLI_VERSION);
        return ExitCode::SUCCESS;
    }

    let Some(command) = args.command else {
        let _ = Args::command().print_help();
        return ExitCode::FAILURE;
    };

    if let Err(err) = init_tracing() {
        eprintln!("{}", styled(Severity::Warning, &format!("{:#}", err)));
    }

    let result = p5_core::run(&P5Library, command.into()).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!(
                "{}",
                styled(Severity::Error, &format!("{} [{}]", err, err.kind()))
            );
            ExitCode::FAILURE
        }
    }
}
