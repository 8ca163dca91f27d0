//! JSON output: extracted text plus recognized key fields.

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use tracing::debug;

use super::OutputWriter;
use crate::error::{OutputError, Result};
use crate::fields::{KeyField, KeyFieldRecognizer, KeyFields};
use crate::models::config::FieldConfig;
use crate::models::transcript::Transcript;

/// Document written to `output.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsonReport {
    #[serde(rename = "Texto Extraído")]
    pub text: String,

    #[serde(rename = "Campos Reconhecidos")]
    pub fields: KeyFields,
}

/// Writes a [`JsonReport`], pretty-printed with four-space indentation.
#[derive(Debug, Clone, Default)]
pub struct JsonWriter {
    recognizer: KeyFieldRecognizer,
}

impl JsonWriter {
    pub fn new(recognizer: KeyFieldRecognizer) -> Self {
        Self { recognizer }
    }

    pub fn from_config(config: &FieldConfig) -> Self {
        Self::new(KeyFieldRecognizer::from_config(config))
    }

    /// Build the report for a transcript.
    pub fn report(&self, transcript: &Transcript) -> JsonReport {
        let fields = self.recognizer.recognize(&transcript.text);

        if fields.is_empty() {
            debug!("No key fields recognized");
        }
        for field in [KeyField::Name, KeyField::Date, KeyField::Signature] {
            if let Some(value) = fields.get(field) {
                debug!("{} = {}", field.label(), value);
            }
        }

        JsonReport {
            text: transcript.text.clone(),
            fields,
        }
    }
}

impl OutputWriter for JsonWriter {
    fn format(&self) -> &'static str {
        "json"
    }

    fn render(&self, transcript: &Transcript) -> Result<Vec<u8>> {
        let report = self.report(transcript);

        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        report
            .serialize(&mut serializer)
            .map_err(OutputError::from)?;

        Ok(buf)
    }
}
