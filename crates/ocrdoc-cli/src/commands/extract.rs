//! Extract command - OCR a single image or PDF into `output.<format>`.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use ocrdoc_core::models::config::{OcrDocConfig, PDFTOPPM_ENV, TESSERACT_ENV};
use ocrdoc_core::{OcrDocError, Pipeline, Progress};

/// Arguments for extracting text from one file.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (PDF or image)
    #[arg(required_unless_present = "show_config")]
    input: Option<PathBuf>,

    /// Output format: txt, docx, pdf or json
    #[arg(default_value = "txt")]
    format: String,

    /// Tesseract binary
    #[arg(long, env = TESSERACT_ENV)]
    tesseract: Option<PathBuf>,

    /// Poppler pdftoppm binary
    #[arg(long, env = PDFTOPPM_ENV)]
    pdftoppm: Option<PathBuf>,

    /// Directory receiving output.<format>
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    show_config: bool,
}

impl ExtractArgs {
    /// Command-line values take precedence over the config file.
    fn apply(&self, config: &mut OcrDocConfig) {
        if let Some(tesseract) = &self.tesseract {
            config.engine.tesseract_cmd = tesseract.clone();
        }
        if let Some(pdftoppm) = &self.pdftoppm {
            config.pdf.pdftoppm_cmd = pdftoppm.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            config.output.output_dir = output_dir.clone();
        }
    }
}

pub fn run(args: ExtractArgs, mut config: OcrDocConfig) -> anyhow::Result<()> {
    args.apply(&mut config);

    if args.show_config {
        return super::config::show(&config);
    }

    let input = args.input.context("no input file given")?;

    debug!("Tesseract: {}", config.engine.tesseract_cmd.display());
    debug!("Languages: {}", config.engine.language_arg());

    let pb = ProgressBar::new(1);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );

    let progress = pb.clone();
    let pipeline = Pipeline::new(&config)?.with_progress(move |event| match event {
        Progress::Started { pages } => {
            progress.set_length(u64::from(pages));
            progress.set_message("Running OCR...");
        }
        Progress::PageDone { page, pages } => {
            progress.set_position(u64::from(page));
            progress.set_message(format!("OCR on page {}/{}", page, pages));
        }
    });

    match pipeline.run(&input, &args.format) {
        Ok(report) => {
            pb.finish_and_clear();
            info!(
                "Recognized {} characters from {} page(s)",
                report.transcript.text.chars().count(),
                report.transcript.page_count
            );
            println!(
                "{} Extracted text saved to {}",
                style("✓").green(),
                report.output_path.display()
            );
            debug!("Total processing time: {:?}", report.elapsed);
            Ok(())
        }
        Err(e @ (OcrDocError::InputNotFound(_) | OcrDocError::UnsupportedFormat(_))) => {
            pb.finish_and_clear();
            println!("{} {}", style("Error:").red(), e);
            if matches!(e, OcrDocError::UnsupportedFormat(_)) {
                println!(
                    "Supported formats: {}",
                    pipeline.writers().formats().join(", ")
                );
            }
            Ok(())
        }
        Err(e) => {
            pb.abandon();
            Err(e).with_context(|| format!("failed to process {}", input.display()))
        }
    }
}
