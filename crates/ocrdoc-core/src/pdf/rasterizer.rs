//! PDF page rasterization with lopdf and Poppler's pdftoppm.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use lopdf::Document;
use tracing::{debug, trace, warn};

use super::{PageRasterizer, Result};
use crate::error::PdfError;
use crate::models::config::PdfConfig;

/// One rendered page on disk.
///
/// The file is removed when the value is dropped.
#[derive(Debug)]
pub struct PageImage {
    number: u32,
    path: PathBuf,
}

impl PageImage {
    /// Take ownership of an already written page file.
    pub fn new(number: u32, path: impl Into<PathBuf>) -> Self {
        Self {
            number,
            path: path.into(),
        }
    }

    /// Page number (1-indexed).
    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Conventional file stem for a page: `page_<n>`.
    pub fn file_stem(number: u32) -> String {
        format!("page_{}", number)
    }
}

impl Drop for PageImage {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => trace!("Removed {}", self.path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove {}: {}", self.path.display(), e),
        }
    }
}

/// Renders PDF pages to `page_<n>.png` files with pdftoppm.
#[derive(Debug, Clone)]
pub struct PdfRasterizer {
    command: PathBuf,
    dpi: u32,
    work_dir: PathBuf,
}

impl PdfRasterizer {
    /// Create a rasterizer from the PDF configuration.
    pub fn new(config: &PdfConfig) -> Self {
        Self {
            command: config.pdftoppm_cmd.clone(),
            dpi: config.render_dpi,
            work_dir: config.work_dir.clone(),
        }
    }

    /// Where page `number` will be written.
    pub fn page_path(&self, number: u32) -> PathBuf {
        self.work_dir
            .join(PageImage::file_stem(number))
            .with_extension("png")
    }
}

impl Default for PdfRasterizer {
    fn default() -> Self {
        Self::new(&PdfConfig::default())
    }
}

impl PageRasterizer for PdfRasterizer {
    fn page_count(&self, pdf: &Path) -> Result<u32> {
        let data = fs::read(pdf).map_err(|e| PdfError::Parse(e.to_string()))?;
        let mut doc = Document::load_mem(&data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");
        }

        let page_count = doc.get_pages().len() as u32;
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        Ok(page_count)
    }

    fn render_page(&self, pdf: &Path, page: u32) -> Result<PageImage> {
        let prefix = self.work_dir.join(PageImage::file_stem(page));
        let page_arg = page.to_string();

        let output = Command::new(&self.command)
            .arg("-f")
            .arg(&page_arg)
            .arg("-l")
            .arg(&page_arg)
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-png")
            .arg("-singlefile")
            .arg(pdf)
            .arg(&prefix)
            .output()
            .map_err(|e| PdfError::Spawn {
                command: self.command.display().to_string(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(PdfError::Render {
                page,
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let path = self.page_path(page);
        if !path.exists() {
            return Err(PdfError::Render {
                page,
                reason: format!("{} did not produce {}", self.command.display(), path.display()),
            });
        }

        debug!("Rendered page {} to {} at {} dpi", page, path.display(), self.dpi);
        Ok(PageImage::new(page, path))
    }
}
