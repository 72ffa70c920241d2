// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser, ValueEnum};
use git_sourcezip::config::DEFAULT_CONFIG_PATH;
use git_sourcezip::utils::logging::{format_error, format_success};
use git_sourcezip::{Config, PipelineOrchestrator, RemoteArchiveRef};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "git_sourcezip")]
#[command(author = "cipher")]
#[command(version)]
#[command(about = "Download a GitHub repository archive and repackage only its source files", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = DEFAULT_CONFIG_PATH
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    /// GitHub user or organization
    owner: String,

    /// Repository name
    repo: String,

    /// Action to run
    #[arg(value_enum)]
    action: Action,

    /// Directory used for staging the download, extracted files and the cleaned zip
    working_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Action {
    /// Download the repository, extract only matching files, and build a cleaned zip
    FetchCleanZip,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    git_sourcezip::utils::logging::init_logger(cli.color, cli.verbose);

    let config = load_config(&cli.config)?;

    match cli.action {
        Action::FetchCleanZip => {
            let Some(working_dir) = cli.working_dir.as_deref() else {
                eprintln!("{}", Cli::command().render_usage());
                eprintln!("fetch-clean-zip requires <WORKING_DIR>");
                std::process::exit(1);
            };

            if let Err(e) = cmd_fetch_clean_zip(&config, &cli.owner, &cli.repo, working_dir).await {
                eprintln!("{}", format_error(&format!("{:#}", e)));
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn load_config(path: &Path) -> Result<Config> {
    info!("Loading configuration from: {}", path.display());

    if !path.exists() {
        warn!(
            "Config file {} not found, using default configuration",
            path.display()
        );
    }

    Config::load(Some(path)).context("Failed to load configuration")
}

async fn cmd_fetch_clean_zip(
    config: &Config,
    owner: &str,
    repo: &str,
    working_dir: &Path,
) -> Result<()> {
    let remote = RemoteArchiveRef::new(owner, repo)?;
    let mut orchestrator = PipelineOrchestrator::new(config.clone())?;

    let report = orchestrator
        .fetch_clean_zip(&remote, working_dir)
        .await
        .with_context(|| format!("fetch-clean-zip failed for {}", remote))?;

    println!(
        "{}",
        format_success(&format!(
            "Orchestration complete. Cleaned zip at: {} ({} files)",
            report.cleaned.path.display(),
            report.stats.entries_archived
        ))
    );

    Ok(())
}
