//! Tesseract OCR engine adapter.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

use image::{GrayImage, ImageFormat};
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::EngineConfig;

/// Something that turns a preprocessed image into text.
pub trait TextRecognizer {
    /// Recognize the text in `image`, keeping the engine's line breaks.
    fn recognize(&self, image: &GrayImage) -> crate::Result<String>;
}

/// Runs the Tesseract command line tool on a temporary PNG.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    command: PathBuf,
    languages: String,
}

impl TesseractEngine {
    /// Create an engine from the resolved engine configuration.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            command: config.tesseract_cmd.clone(),
            languages: config.language_arg(),
        }
    }

    /// Run the engine on an image file already on disk.
    pub fn recognize_file(&self, image_path: &Path) -> Result<String, OcrError> {
        let start = Instant::now();

        let output = Command::new(&self.command)
            .arg(image_path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.languages)
            .output()
            .map_err(|e| OcrError::Spawn {
                command: self.command.display().to_string(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(OcrError::Engine {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = clean_engine_output(&String::from_utf8(output.stdout)?);

        info!(
            "OCR complete: {} chars in {}ms",
            text.len(),
            start.elapsed().as_millis()
        );

        Ok(text)
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl TextRecognizer for TesseractEngine {
    fn recognize(&self, image: &GrayImage) -> crate::Result<String> {
        let temp_path = tempfile::Builder::new()
            .prefix("ocrdoc_")
            .suffix(".png")
            .tempfile()?
            .into_temp_path();

        image.save_with_format(&temp_path, ImageFormat::Png)?;
        debug!(
            "Running {} -l {} on {}",
            self.command.display(),
            self.languages,
            temp_path.display()
        );

        Ok(self.recognize_file(&temp_path)?)
    }
}

/// Strip the form feed Tesseract appends after each page.
fn clean_engine_output(text: &str) -> String {
    text.replace('\x0c', "")
}
