//! Extracted text of one input document.

use serde::{Deserialize, Serialize};

use crate::input::InputKind;

/// Separator appended after every PDF page.
pub const PAGE_SEPARATOR: &str = "\n\n";

/// Text extracted from one input, plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    /// Full text; PDF pages each end with a blank-line separator.
    pub text: String,

    /// Number of rasterized pages (1 for images).
    pub page_count: u32,

    /// Kind of the input the text came from.
    pub source: InputKind,
}

impl Transcript {
    /// Transcript of a single image.
    pub fn from_image(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            page_count: 1,
            source: InputKind::Image,
        }
    }

    /// Transcript of a PDF built from per-page texts, in page order.
    pub fn from_pages<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        let mut page_count = 0;
        for page in pages {
            text.push_str(page.as_ref());
            text.push_str(PAGE_SEPARATOR);
            page_count += 1;
        }
        Self {
            text,
            page_count,
            source: InputKind::Pdf,
        }
    }
}
