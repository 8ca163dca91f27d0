//! PDF output using `printpdf`.
//!
//! printpdf 0.8 builds documents from `PdfPage` values holding `Vec<Op>`
//! operation lists, serialised with `PdfDocument::save()`.
//!
//! Built-in fonts are declared with `/WinAnsiEncoding`, but printpdf writes
//! built-in font strings as UTF-8. Lines are therefore encoded to
//! Windows-1252 here and shown with a raw `Tj` operator.

use encoding_rs::WINDOWS_1252;
use printpdf::{
    BuiltinFont, DictItem, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt,
};
use tracing::{debug, warn};

use super::OutputWriter;
use crate::error::Result;
use crate::models::config::PdfOutputConfig;
use crate::models::transcript::Transcript;

/// A4 width in millimetres.
const PAGE_WIDTH_MM: f32 = 210.0;

/// A4 height in millimetres.
const PAGE_HEIGHT_MM: f32 = 297.0;

/// Lowest baseline used when pagination is enabled, in points.
const BOTTOM_MARGIN_PT: f32 = 40.0;

const FONT: BuiltinFont = BuiltinFont::Helvetica;

/// Encode `text` for a WinAnsi built-in font.
///
/// Characters outside Windows-1252 become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    let mut buf = [0u8; 4];

    for c in text.chars() {
        let (bytes, _, had_errors) = WINDOWS_1252.encode(c.encode_utf8(&mut buf));
        if had_errors {
            out.push(b'?');
        } else {
            out.extend_from_slice(&bytes);
        }
    }

    out
}

/// A line placed on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine<'a> {
    pub y: f32,
    pub text: &'a str,
}

/// Draws each text line at a fixed left margin, top to bottom.
///
/// Without pagination every line goes on the first page, so lines whose
/// baseline falls below zero are drawn off the page and are not visible.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    layout: PdfOutputConfig,
}

impl PdfWriter {
    pub fn new(layout: PdfOutputConfig) -> Self {
        Self { layout }
    }

    /// Assign every line a page and a baseline.
    pub fn layout<'a>(&self, text: &'a str) -> Vec<Vec<PlacedLine<'a>>> {
        let mut pages = vec![Vec::new()];
        let mut y = self.layout.start_y;

        for line in text.split('\n') {
            if self.layout.paginate && y < BOTTOM_MARGIN_PT && !pages[pages.len() - 1].is_empty() {
                pages.push(Vec::new());
                y = self.layout.start_y;
            }
            if let Some(page) = pages.last_mut() {
                page.push(PlacedLine { y, text: line });
            }
            y -= self.layout.line_height;
        }

        pages
    }

    fn page_ops(&self, lines: &[PlacedLine<'_>]) -> Vec<Op> {
        // Emits nothing; makes printpdf add the font to the page resources.
        let mut ops = vec![Op::WriteTextBuiltinFont {
            items: Vec::new(),
            font: FONT,
        }];

        for line in lines.iter().filter(|l| !l.text.is_empty()) {
            ops.push(Op::StartTextSection);
            ops.push(Op::SetTextCursor {
                pos: Point {
                    x: Pt(self.layout.left_margin),
                    y: Pt(line.y),
                },
            });
            ops.push(Op::SetFontSizeBuiltinFont {
                size: Pt(self.layout.font_size),
                font: FONT,
            });
            ops.push(Op::Unknown {
                key: "Tj".to_string(),
                value: vec![DictItem::String {
                    data: encode_win_ansi(line.text),
                    literal: false,
                }],
            });
            ops.push(Op::EndTextSection);
        }

        ops
    }
}

impl OutputWriter for PdfWriter {
    fn format(&self) -> &'static str {
        "pdf"
    }

    fn render(&self, transcript: &Transcript) -> Result<Vec<u8>> {
        let layout = self.layout(&transcript.text);

        let off_page = layout
            .iter()
            .flatten()
            .filter(|line| line.y < 0.0 && !line.text.is_empty())
            .count();
        if off_page > 0 {
            warn!("{} lines fall below the page and will not be visible", off_page);
        }

        let pages: Vec<PdfPage> = layout
            .iter()
            .map(|lines| PdfPage::new(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), self.page_ops(lines)))
            .collect();

        let mut doc = PdfDocument::new("Extracted text");
        doc.with_pages(pages);

        debug!("Text layout complete: {} pages", doc.pages.len());

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        // Raw operators are dropped in secure mode.
        let options = PdfSaveOptions {
            secure: false,
            ..PdfSaveOptions::default()
        };
        let output = doc.save(&options, &mut warnings);

        Ok(output)
    }
}
