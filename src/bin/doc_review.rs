// file: src/bin/doc_review.rs
// description: documentation review companion: index sources, review pages, list repository docs
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use git_sourcezip::analysis::{
    AnalysisCredentials, DocumentReviewer, FileSearchClient, KnowledgeBase,
};
use git_sourcezip::config::DEFAULT_CONFIG_PATH;
use git_sourcezip::utils::logging::{format_error, format_info, format_success};
use git_sourcezip::{Config, RemoteArchiveRef, SuffixFilter, TreeLister};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "doc-review")]
#[command(author = "cipher")]
#[command(version)]
#[command(about = "Review repository documentation with a hosted file-search model", long_about = None)]
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

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload every file under a directory into a new vector store
    Index {
        /// Directory to upload, usually the extracted source tree
        dir: PathBuf,
    },

    /// Ask the model to propose changes to a documentation page
    Review {
        /// Markdown document to review
        document: PathBuf,

        #[arg(long, value_name = "ID")]
        vector_store: String,
    },

    /// List files in a repository tree that end with a suffix
    ListDocs {
        owner: String,

        repo: String,

        #[arg(long, default_value = ".md")]
        suffix: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    git_sourcezip::utils::logging::init_logger(cli.color, cli.verbose);

    let config = Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?;

    let result = match cli.command {
        Commands::Index { dir } => {
            let client = file_search_client(&config);
            cmd_index(&config, &client, &dir).await
        }
        Commands::Review {
            document,
            vector_store,
        } => {
            let client = file_search_client(&config);
            cmd_review(&config, &client, &document, &vector_store).await
        }
        Commands::ListDocs {
            owner,
            repo,
            suffix,
        } => cmd_list_docs(&config, &owner, &repo, &suffix).await,
    };

    if let Err(e) = result {
        eprintln!("{}", format_error(&format!("{:#}", e)));
        std::process::exit(1);
    }

    Ok(())
}

/// Exits before any request is made when the api key is missing.
fn file_search_client(config: &Config) -> FileSearchClient {
    match AnalysisCredentials::from_env(&config.analysis.api_key_env) {
        Ok(credentials) => FileSearchClient::new(&config.analysis.api_base_url, credentials),
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string()));
            std::process::exit(1);
        }
    }
}

async fn cmd_index(config: &Config, client: &FileSearchClient, dir: &Path) -> Result<()> {
    let knowledge_base = KnowledgeBase::new(client, &config.analysis.vector_store_name);
    let indexed = knowledge_base
        .index_directory(dir)
        .await
        .with_context(|| format!("Failed to index {}", dir.display()))?;

    for file in &indexed.files {
        println!(
            "{}",
            format_info(&format!(
                "{} {}",
                file.id,
                file.status.as_deref().unwrap_or("unknown")
            ))
        );
    }
    println!(
        "{}",
        format_success(&format!(
            "Vector store {} holds {} files",
            indexed.vector_store_id,
            indexed.file_ids.len()
        ))
    );

    Ok(())
}

async fn cmd_review(
    config: &Config,
    client: &FileSearchClient,
    document: &Path,
    vector_store: &str,
) -> Result<()> {
    let reviewer = DocumentReviewer::new(client, config.analysis.clone());
    let response = reviewer
        .review(document, vector_store)
        .await
        .with_context(|| format!("Failed to review {}", document.display()))?;

    info!("Response id: {}", response.id);
    println!("{}", response.text);

    Ok(())
}

async fn cmd_list_docs(config: &Config, owner: &str, repo: &str, suffix: &str) -> Result<()> {
    let remote = RemoteArchiveRef::new(owner, repo)?;
    let lister = TreeLister::new(config.remote.clone())?;

    let paths = lister
        .list_paths(&remote, &SuffixFilter::new(suffix))
        .await
        .with_context(|| format!("Failed to fetch repo tree for {}", remote))?;

    for path in paths {
        println!("{}", path);
    }

    Ok(())
}
