//! PDF processing module.

mod rasterizer;

pub use rasterizer::{PageImage, PdfRasterizer};

use std::path::Path;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for turning PDF pages into image files.
pub trait PageRasterizer {
    /// Get the number of pages in the PDF.
    fn page_count(&self, pdf: &Path) -> Result<u32>;

    /// Render a page (1-indexed) to an image file owned by the returned value.
    fn render_page(&self, pdf: &Path, page: u32) -> Result<PageImage>;
}
