//! Plain text output.

use super::OutputWriter;
use crate::error::Result;
use crate::models::transcript::Transcript;

/// Writes the raw text as UTF-8.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextWriter;

impl OutputWriter for TextWriter {
    fn format(&self) -> &'static str {
        "txt"
    }

    fn render(&self, transcript: &Transcript) -> Result<Vec<u8>> {
        Ok(transcript.text.as_bytes().to_vec())
    }
}
