//! Key-field recognition: name, date and signature lines.

pub mod patterns;
mod recognizer;

pub use recognizer::{FieldMatch, KeyField, KeyFieldRecognizer, KeyFields, SIGNATURE_MARKER};
