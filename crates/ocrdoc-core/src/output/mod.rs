//! Output writers, one per format, selected by format name.

mod docx;
mod json;
mod pdf;
mod text;

pub use docx::DocxWriter;
pub use json::{JsonReport, JsonWriter};
pub use pdf::PdfWriter;
pub use text::TextWriter;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{OcrDocError, Result};
use crate::models::config::OcrDocConfig;
use crate::models::transcript::Transcript;

/// Serializes a transcript into one output format.
pub trait OutputWriter {
    /// Format name, also used as the file extension.
    fn format(&self) -> &'static str;

    /// Serialize the transcript to bytes.
    fn render(&self, transcript: &Transcript) -> Result<Vec<u8>>;

    /// Serialize the transcript and write it to `path`.
    fn write(&self, transcript: &Transcript, path: &Path) -> Result<()> {
        let bytes = self.render(transcript)?;
        fs::write(path, &bytes)?;
        info!("Wrote {} bytes of {} to {}", bytes.len(), self.format(), path.display());
        Ok(())
    }
}

/// Conventional output file for a format: `<dir>/output.<format>`.
pub fn output_path(dir: &Path, format: &str) -> PathBuf {
    dir.join(format!("output.{}", format))
}

/// Maps format names to writers.
pub struct WriterRegistry {
    writers: BTreeMap<&'static str, Box<dyn OutputWriter>>,
}

impl WriterRegistry {
    /// A registry with no formats.
    pub fn empty() -> Self {
        Self {
            writers: BTreeMap::new(),
        }
    }

    /// The built-in `txt`, `docx`, `pdf` and `json` writers.
    pub fn from_config(config: &OcrDocConfig) -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(TextWriter));
        registry.register(Box::new(DocxWriter));
        registry.register(Box::new(PdfWriter::new(config.output.pdf.clone())));
        registry.register(Box::new(JsonWriter::from_config(&config.fields)));
        registry
    }

    /// Add a writer, replacing any writer for the same format.
    pub fn register(&mut self, writer: Box<dyn OutputWriter>) {
        self.writers.insert(writer.format(), writer);
    }

    /// Look up the writer for `format` (exact, case-sensitive).
    pub fn get(&self, format: &str) -> Result<&dyn OutputWriter> {
        self.writers
            .get(format)
            .map(|w| w.as_ref())
            .ok_or_else(|| OcrDocError::UnsupportedFormat(format.to_string()))
    }

    /// Registered format names, sorted.
    pub fn formats(&self) -> Vec<&'static str> {
        self.writers.keys().copied().collect()
    }
}

impl Default for WriterRegistry {
    fn default() -> Self {
        Self::from_config(&OcrDocConfig::default())
    }
}
