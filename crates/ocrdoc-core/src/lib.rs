//! Core library for extracting text from scanned documents.
//!
//! This crate provides:
//! - PDF page rasterization through Poppler's `pdftoppm`
//! - Image cleanup (upscale, blur, adaptive threshold) before OCR
//! - Text recognition through the Tesseract command-line engine
//! - Heuristic key-field recognition (name, date, signature)
//! - Output writers for plain text, DOCX, PDF and JSON

pub mod error;
pub mod fields;
pub mod input;
pub mod models;
pub mod ocr;
pub mod output;
pub mod pdf;
pub mod pipeline;

pub use error::{OcrDocError, Result};
pub use fields::{KeyFieldRecognizer, KeyFields};
pub use input::{InputDocument, InputKind};
pub use models::config::OcrDocConfig;
pub use models::transcript::Transcript;
pub use ocr::{ImagePreprocessor, TesseractEngine, TextRecognizer};
pub use output::{OutputWriter, WriterRegistry};
pub use pdf::{PageRasterizer, PdfRasterizer};
pub use pipeline::{Pipeline, Progress, RunReport};
