//! Input resolution: existence check and PDF/image classification.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{OcrDocError, Result};

/// Kind of input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    /// Paginated document, rasterized before OCR.
    Pdf,
    /// Anything else; handed to the image decoder as is.
    Image,
}

impl InputKind {
    /// Classify a path by a `.pdf` file name suffix, ignoring case.
    ///
    /// A file named just `.pdf` counts as a PDF.
    pub fn from_path(path: &Path) -> Self {
        let is_pdf = path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().to_ascii_lowercase().ends_with(".pdf"));

        if is_pdf { Self::Pdf } else { Self::Image }
    }
}

/// A validated input path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDocument {
    path: PathBuf,
    kind: InputKind,
}

impl InputDocument {
    /// Check that `path` exists and classify it.
    pub fn resolve(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Err(OcrDocError::InputNotFound(path));
        }

        let kind = InputKind::from_path(&path);
        debug!("Resolved {} as {:?}", path.display(), kind);

        Ok(Self { path, kind })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> InputKind {
        self.kind
    }
}
