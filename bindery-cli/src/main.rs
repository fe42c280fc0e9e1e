//! Bindery CLI - build EPUB and MOBI books from a JSON manifest

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bindery")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a book from a manifest
    Generate {
        /// Manifest file (same JSON shape as the HTTP API body)
        manifest: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Output format (epub, mobi)
        #[arg(short, long, default_value = "epub")]
        format: String,

        /// Local cover image, replacing any title_image_url in the manifest
        #[arg(long)]
        cover: Option<PathBuf>,

        /// Converter executable (overrides BINDERY_CONVERTER)
        #[arg(long)]
        converter: Option<PathBuf>,

        /// Directory for temporary files (overrides BINDERY_WORK_DIR)
        #[arg(long)]
        work_dir: Option<PathBuf>,
    },

    /// Check a manifest without fetching anything
    Validate {
        /// Manifest file
        manifest: PathBuf,
    },

    /// Display information about an EPUB
    Info {
        /// Input file path
        input: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "bindery_cli=debug,bindery_core=debug"
    } else {
        "bindery_cli=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Generate {
            manifest,
            output,
            format,
            cover,
            converter,
            work_dir,
        } => {
            let options = commands::GenerateOptions {
                format: format.parse().map_err(anyhow::Error::msg)?,
                cover,
                converter,
                work_dir,
            };
            commands::generate(&manifest, &output, options).await
        }

        Commands::Validate { manifest } => commands::validate(&manifest),

        Commands::Info { input, json } => commands::info(&input, json),
    }
}
