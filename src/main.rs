use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use doccmp::compare::{compare_files, CompareOptions};
use doccmp::config::Config;
use doccmp::error::error_chain;
use doccmp::similarity::SentenceEmbedder;

/// doccmp: compare two documents by meaning and by line.
///
/// Extracts text from plain text, HTML, spreadsheet, Word, PDF and
/// PowerPoint files, then reports a semantic similarity score and a
/// unified diff.
#[derive(Parser)]
#[command(name = "doccmp", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two documents
    Compare {
        /// First document (the "File 1" side of the diff)
        file1: PathBuf,

        /// Second document (the "File 2" side of the diff)
        file2: PathBuf,

        /// Print the result as JSON instead of colored text
        #[arg(long)]
        json: bool,

        /// Only show the score and change counts, not the diff itself
        #[arg(long)]
        no_diff: bool,

        /// Lines of context around each diff hunk (default: DOCCMP_DIFF_CONTEXT or 3)
        #[arg(long)]
        context: Option<usize>,
    },

    /// Print the text extracted from a document
    Extract {
        /// The document to read
        file: PathBuf,
    },

    /// List the supported file types
    Formats,

    /// Download the sentence embedding model (~90 MB)
    DownloadModel,

    /// Serve the upload form over HTTP
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on (default: 5000)
        #[arg(long, default_value = "5000")]
        port: u16,

        /// Address to bind (default: 127.0.0.1)
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("doccmp=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compare {
            file1,
            file2,
            json,
            no_diff,
            context,
        } => {
            let config = Config::load()?;
            config.require_model()?;

            let embedder = load_embedder(&config)?;
            let options = CompareOptions {
                context_lines: context.unwrap_or(config.diff_context),
            };

            let result = tokio::task::spawn_blocking(move || {
                compare_files(&embedder, &file1, &file2, options)
            })
            .await
            .context("Comparison task panicked")?
            .map_err(|e| anyhow::anyhow!(error_chain(&e)))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                doccmp::output::terminal::display_comparison(&result, !no_diff);
            }
        }

        Commands::Extract { file } => {
            let text = doccmp::extract::extract_any(&file)
                .map_err(|e| anyhow::anyhow!(error_chain(&e)))?;
            print!("{text}");
            if !text.ends_with('\n') {
                println!();
            }
        }

        Commands::Formats => {
            doccmp::output::terminal::display_formats();
        }

        Commands::DownloadModel => {
            let config = Config::load()?;

            println!("Downloading ONNX model...");
            println!("  Destination: {}", config.model_dir.display());

            doccmp::similarity::download::download_model(&config.model_dir).await?;

            println!("\n{}", "Model downloaded successfully.".bold());
            println!("You can now run `doccmp compare <file1> <file2>`.");
        }

        #[cfg(feature = "web")]
        Commands::Serve { port, bind } => {
            let config = Config::load()?;
            config.require_model()?;

            // Load once up front; every request shares this instance
            let embedder: std::sync::Arc<dyn doccmp::similarity::TextEmbedder> =
                std::sync::Arc::new(load_embedder(&config)?);

            doccmp::web::run_server(config, embedder, port, &bind).await?;
        }
    }

    Ok(())
}

fn load_embedder(config: &Config) -> Result<SentenceEmbedder> {
    let dir = doccmp::similarity::download::embedding_model_dir(&config.model_dir);
    info!("Loading sentence embedding model from {}", dir.display());
    SentenceEmbedder::load(&dir)
}
