//! Error types for the ocrdoc-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the ocrdoc library.
#[derive(Error, Debug)]
pub enum OcrDocError {
    /// The input path does not exist.
    #[error("file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// No writer is registered for the requested output format.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Output serialization error.
    #[error("output error: {0}")]
    Output(#[from] OutputError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// The rasterizer binary could not be started.
    #[error("failed to run {command}: {reason}")]
    Spawn { command: String, reason: String },

    /// The rasterizer ran but failed on a page.
    #[error("failed to render page {page}: {reason}")]
    Render { page: u32, reason: String },
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The engine binary could not be started.
    #[error("failed to run {command}: {reason}")]
    Spawn { command: String, reason: String },

    /// The engine exited with a failure status.
    #[error("engine exited with {status}: {stderr}")]
    Engine { status: String, stderr: String },

    /// The engine produced output that is not valid UTF-8.
    #[error("engine output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    /// Image preprocessing failed.
    #[error("preprocessing failed: {0}")]
    Preprocessing(String),
}

/// Errors related to writing output files.
#[derive(Error, Debug)]
pub enum OutputError {
    /// Failed to build the DOCX package.
    #[error("failed to build DOCX: {0}")]
    Docx(String),

    /// Failed to serialize JSON.
    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for the ocrdoc library.
pub type Result<T> = std::result::Result<T, OcrDocError>;
