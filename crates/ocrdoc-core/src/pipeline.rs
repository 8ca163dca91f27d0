//! The extraction pipeline: input → pages → preprocessing → OCR → output file.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::error::Result;
use crate::input::{InputDocument, InputKind};
use crate::models::config::OcrDocConfig;
use crate::models::transcript::Transcript;
use crate::ocr::{ImagePreprocessor, TesseractEngine, TextRecognizer};
use crate::output::{WriterRegistry, output_path};
use crate::pdf::{PageRasterizer, PdfRasterizer};

/// Progress notifications emitted while pages are recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Recognition is about to start on `pages` pages.
    Started { pages: u32 },
    /// Page `page` of `pages` has been recognized.
    PageDone { page: u32, pages: u32 },
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// File that was written.
    pub output_path: PathBuf,
    /// Text that was written.
    pub transcript: Transcript,
    /// Wall time of the whole run.
    pub elapsed: Duration,
}

/// Sequential OCR pipeline for a single input file.
pub struct Pipeline {
    preprocessor: ImagePreprocessor,
    recognizer: Box<dyn TextRecognizer>,
    rasterizer: Box<dyn PageRasterizer>,
    writers: WriterRegistry,
    output_dir: PathBuf,
    progress: Option<Box<dyn Fn(Progress)>>,
}

impl Pipeline {
    /// Build the pipeline with Tesseract and pdftoppm from `config`.
    pub fn new(config: &OcrDocConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            preprocessor: ImagePreprocessor::new(config.preprocess.clone()),
            recognizer: Box::new(TesseractEngine::new(&config.engine)),
            rasterizer: Box::new(PdfRasterizer::new(&config.pdf)),
            writers: WriterRegistry::from_config(config),
            output_dir: config.output.output_dir.clone(),
            progress: None,
        })
    }

    /// Replace the OCR engine.
    pub fn with_recognizer(mut self, recognizer: Box<dyn TextRecognizer>) -> Self {
        self.recognizer = recognizer;
        self
    }

    /// Replace the PDF rasterizer.
    pub fn with_rasterizer(mut self, rasterizer: Box<dyn PageRasterizer>) -> Self {
        self.rasterizer = rasterizer;
        self
    }

    /// Receive [`Progress`] notifications.
    pub fn with_progress(mut self, callback: impl Fn(Progress) + 'static) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    pub fn writers(&self) -> &WriterRegistry {
        &self.writers
    }

    /// Resolve the input, recognize it and write `output.<format>`.
    ///
    /// The format is checked before any OCR work is done.
    pub fn run(&self, input: impl Into<PathBuf>, format: &str) -> Result<RunReport> {
        let start = Instant::now();

        let input = InputDocument::resolve(input)?;
        let writer = self.writers.get(format)?;

        info!("Processing file: {}", input.path().display());
        let transcript = self.extract(&input)?;

        let output_path = output_path(&self.output_dir, writer.format());
        writer.write(&transcript, &output_path)?;

        Ok(RunReport {
            output_path,
            transcript,
            elapsed: start.elapsed(),
        })
    }

    /// Recognize all text in a resolved input.
    pub fn extract(&self, input: &InputDocument) -> Result<Transcript> {
        match input.kind() {
            InputKind::Pdf => self.extract_pdf(input.path()),
            InputKind::Image => {
                self.notify(Progress::Started { pages: 1 });
                let text = self.recognize_file(input.path())?;
                self.notify(Progress::PageDone { page: 1, pages: 1 });
                Ok(Transcript::from_image(text))
            }
        }
    }

    fn extract_pdf(&self, path: &Path) -> Result<Transcript> {
        let pages = self.rasterizer.page_count(path)?;
        debug!("PDF has {} pages", pages);
        self.notify(Progress::Started { pages });

        let mut texts = Vec::with_capacity(pages as usize);
        for number in 1..=pages {
            let page = self.rasterizer.render_page(path, number)?;
            let text = self.recognize_file(page.path())?;
            // Removes page_<n>.png before the next page is rendered
            drop(page);

            texts.push(text);
            self.notify(Progress::PageDone {
                page: number,
                pages,
            });
        }

        Ok(Transcript::from_pages(texts))
    }

    fn recognize_file(&self, path: &Path) -> Result<String> {
        let image = self.preprocessor.open(path)?;
        self.recognizer.recognize(&image)
    }

    fn notify(&self, event: Progress) {
        if let Some(callback) = &self.progress {
            callback(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{OcrDocError, PdfError};
    use crate::fields::SIGNATURE_MARKER;
    use crate::output::JsonReport;
    use crate::pdf::PageImage;
    use image::{GrayImage, Luma};
    use pretty_assertions::assert_eq;
    use std::cell::{Cell, RefCell};
    use std::fs;
    use std::rc::Rc;

    /// Returns fixed text and counts its calls.
    struct FixedRecognizer {
        text: String,
        calls: Rc<Cell<usize>>,
    }

    impl TextRecognizer for FixedRecognizer {
        fn recognize(&self, _image: &GrayImage) -> Result<String> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.text.clone())
        }
    }

    /// Reports the page number encoded in the image width.
    struct WidthRecognizer;

    impl TextRecognizer for WidthRecognizer {
        fn recognize(&self, image: &GrayImage) -> Result<String> {
            // Pages are 10 px wide per page number; preprocessing upscales 1.5x.
            Ok(format!("page {}", image.width() / 15))
        }
    }

    /// Writes `page_<n>.png` files without calling out to Poppler.
    struct FakeRasterizer {
        dir: PathBuf,
        pages: u32,
        fail_on: Option<u32>,
    }

    impl PageRasterizer for FakeRasterizer {
        fn page_count(&self, _pdf: &Path) -> crate::pdf::Result<u32> {
            Ok(self.pages)
        }

        fn render_page(&self, _pdf: &Path, page: u32) -> crate::pdf::Result<PageImage> {
            if self.fail_on == Some(page) {
                return Err(PdfError::Render {
                    page,
                    reason: "boom".to_string(),
                });
            }
            let path = self.dir.join(format!("page_{}.png", page));
            GrayImage::from_pixel(page * 10, 10, Luma([255]))
                .save(&path)
                .unwrap();
            Ok(PageImage::new(page, path))
        }
    }

    fn config_for(dir: &Path) -> OcrDocConfig {
        let mut config = OcrDocConfig::default();
        config.output.output_dir = dir.to_path_buf();
        config.pdf.work_dir = dir.to_path_buf();
        config
    }

    fn write_png(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        GrayImage::from_pixel(20, 20, Luma([255])).save(&path).unwrap();
        path
    }

    fn page_files(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with("page_"))
            .collect()
    }

    #[test]
    fn test_image_to_json() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_png(dir.path(), "form.png");
        let calls = Rc::new(Cell::new(0));

        let pipeline = Pipeline::new(&config_for(dir.path()))
            .unwrap()
            .with_recognizer(Box::new(FixedRecognizer {
                text: "Nome: Ana\nData: 2024-01-01\nAssinatura".to_string(),
                calls: calls.clone(),
            }));

        let report = pipeline.run(&input, "json").unwrap();
        assert_eq!(report.output_path, dir.path().join("output.json"));
        assert_eq!(calls.get(), 1);

        let parsed: JsonReport =
            serde_json::from_slice(&fs::read(&report.output_path).unwrap()).unwrap();
        assert_eq!(parsed.text, report.transcript.text);
        assert_eq!(parsed.fields.name.as_deref(), Some("Nome: Ana"));
        assert_eq!(parsed.fields.date.as_deref(), Some("Data: 2024-01-01"));
        assert_eq!(parsed.fields.signature.as_deref(), Some(SIGNATURE_MARKER));
    }

    #[test]
    fn test_pdf_pages_in_order_and_cleaned_up() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("scan.pdf");
        fs::write(&input, b"%PDF-1.4").unwrap();

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();

        let pipeline = Pipeline::new(&config_for(dir.path()))
            .unwrap()
            .with_recognizer(Box::new(WidthRecognizer))
            .with_rasterizer(Box::new(FakeRasterizer {
                dir: dir.path().to_path_buf(),
                pages: 3,
                fail_on: None,
            }))
            .with_progress(move |event| sink.borrow_mut().push(event));

        let report = pipeline.run(&input, "txt").unwrap();

        assert_eq!(report.transcript.page_count, 3);
        assert_eq!(report.transcript.text, "page 1\n\npage 2\n\npage 3\n\n");
        assert_eq!(
            fs::read_to_string(dir.path().join("output.txt")).unwrap(),
            report.transcript.text
        );
        assert!(page_files(dir.path()).is_empty());
        assert_eq!(
            *events.borrow(),
            vec![
                Progress::Started { pages: 3 },
                Progress::PageDone { page: 1, pages: 3 },
                Progress::PageDone { page: 2, pages: 3 },
                Progress::PageDone { page: 3, pages: 3 },
            ]
        );
    }

    #[test]
    fn test_failed_page_leaves_no_page_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("scan.pdf");
        fs::write(&input, b"%PDF-1.4").unwrap();

        let pipeline = Pipeline::new(&config_for(dir.path()))
            .unwrap()
            .with_recognizer(Box::new(WidthRecognizer))
            .with_rasterizer(Box::new(FakeRasterizer {
                dir: dir.path().to_path_buf(),
                pages: 3,
                fail_on: Some(2),
            }));

        let err = pipeline.run(&input, "txt").unwrap_err();
        assert!(matches!(err, OcrDocError::Pdf(PdfError::Render { page: 2, .. })));
        assert!(page_files(dir.path()).is_empty());
        assert!(!dir.path().join("output.txt").exists());
    }

    #[test]
    fn test_unsupported_format_skips_ocr() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_png(dir.path(), "form.png");
        let calls = Rc::new(Cell::new(0));

        let pipeline = Pipeline::new(&config_for(dir.path()))
            .unwrap()
            .with_recognizer(Box::new(FixedRecognizer {
                text: "text".to_string(),
                calls: calls.clone(),
            }));

        let err = pipeline.run(&input, "xml").unwrap_err();
        assert!(matches!(err, OcrDocError::UnsupportedFormat(_)));
        assert_eq!(calls.get(), 0);
        assert!(!dir.path().join("output.xml").exists());
    }

    #[test]
    fn test_missing_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(&config_for(dir.path())).unwrap();

        let err = pipeline.run(dir.path().join("nope.png"), "txt").unwrap_err();
        assert!(matches!(err, OcrDocError::InputNotFound(_)));
        assert!(!dir.path().join("output.txt").exists());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = OcrDocConfig::default();
        config.preprocess.threshold_block = 30;
        assert!(matches!(Pipeline::new(&config), Err(OcrDocError::Config(_))));
    }
}
