//! CLI application for extracting text from scanned images and PDFs.

mod commands;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{config, extract};

/// OCR for scanned documents - extract text and key fields from images and PDFs
#[derive(Parser)]
#[command(name = "ocrdoc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    #[command(flatten)]
    extract: extract::ExtractArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = config::load(cli.config.as_deref())?;
    extract::run(cli.extract, config)
}
