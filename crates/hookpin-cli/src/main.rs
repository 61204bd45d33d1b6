//! hookpin CLI - re-pins pre-commit additional_dependencies from lock files.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use hookpin_cli::{sync_config, HeuristicLanguageResolver, SyncOptions};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hookpin")]
#[command(about = "Keep pre-commit additional_dependencies in sync with your lock files", long_about = None)]
struct Cli {
    /// Lock files to read installed versions from
    ///
    /// Supported: yarn.lock (classic and berry), package-lock.json,
    /// poetry.lock, requirements*.txt. At most one lock file per ecosystem.
    #[arg(value_name = "LOCK_FILES", required = true)]
    lock_files: Vec<PathBuf>,

    /// Pre-commit configuration to rewrite
    #[arg(long, default_value = ".pre-commit-config.yaml")]
    config: PathBuf,

    /// Report what would change without writing the configuration
    #[arg(long)]
    dry_run: bool,

    /// Fail when a pinned dependency is missing from the lock files
    #[arg(long)]
    strict: bool,

    /// Verbose output
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let locks = hookpin_lock::load_lock_files(&cli.lock_files)?;
    let options = SyncOptions {
        config_path: cli.config,
        dry_run: cli.dry_run,
        strict: cli.strict,
    };
    let report = sync_config(&options, &locks, &HeuristicLanguageResolver)?;

    if report.repins.is_empty() {
        println!("{}", "all pinned dependencies match the lock files".green());
    } else {
        for repin in &report.repins {
            println!(
                "{} {} {} {} ({}: {})",
                "repinned".green(),
                repin.previous,
                "->".dimmed(),
                repin.pinned.bold(),
                repin.repo,
                repin.hook
            );
        }
    }
    if cli.dry_run {
        println!("{}", "dry run, configuration left untouched".yellow());
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
