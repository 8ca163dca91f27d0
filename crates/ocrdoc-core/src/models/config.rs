//! Configuration structures for the OCR pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::OcrDocError;

/// Environment variable overriding the Tesseract binary.
pub const TESSERACT_ENV: &str = "OCRDOC_TESSERACT";

/// Environment variable overriding the pdftoppm binary.
pub const PDFTOPPM_ENV: &str = "OCRDOC_PDFTOPPM";

/// Main configuration for the ocrdoc pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrDocConfig {
    /// Image cleanup applied before OCR.
    pub preprocess: PreprocessConfig,

    /// OCR engine configuration.
    pub engine: EngineConfig,

    /// PDF rasterization configuration.
    pub pdf: PdfConfig,

    /// Key-field recognition configuration.
    pub fields: FieldConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// How the local threshold is computed during binarization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdMethod {
    /// Gaussian-weighted mean of the neighbourhood.
    Gaussian,
    /// Plain mean of the neighbourhood.
    Mean,
}

/// Image preprocessing configuration.
///
/// The defaults are tuned for typical scanned-document contrast:
/// 1.5x bilinear upscale, 5x5 Gaussian blur, then adaptive thresholding
/// over a 31 pixel neighbourhood with an offset of 2.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Upscale factor applied to both axes.
    pub scale: f32,

    /// Side of the square Gaussian blur kernel (odd).
    pub blur_kernel: u32,

    /// Side of the square thresholding neighbourhood (odd, >= 3).
    pub threshold_block: u32,

    /// Constant subtracted from the local mean.
    pub threshold_offset: i32,

    /// Local mean weighting.
    pub threshold_method: ThresholdMethod,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            scale: 1.5,
            blur_kernel: 5,
            threshold_block: 31,
            threshold_offset: 2,
            threshold_method: ThresholdMethod::Gaussian,
        }
    }
}

impl PreprocessConfig {
    /// Check that the constants describe a valid pipeline.
    pub fn validate(&self) -> Result<(), OcrDocError> {
        if !(self.scale > 0.0) || !self.scale.is_finite() {
            return Err(OcrDocError::Config(format!(
                "preprocess.scale must be a positive number, got {}",
                self.scale
            )));
        }
        if self.blur_kernel % 2 == 0 {
            return Err(OcrDocError::Config(format!(
                "preprocess.blur_kernel must be odd, got {}",
                self.blur_kernel
            )));
        }
        if self.threshold_block < 3 || self.threshold_block % 2 == 0 {
            return Err(OcrDocError::Config(format!(
                "preprocess.threshold_block must be odd and at least 3, got {}",
                self.threshold_block
            )));
        }
        Ok(())
    }
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Tesseract binary.
    pub tesseract_cmd: PathBuf,

    /// Recognition languages, joined with `+` on the command line.
    pub languages: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tesseract_cmd: default_tesseract_cmd(),
            languages: vec!["eng".to_string(), "por".to_string()],
        }
    }
}

impl EngineConfig {
    /// Language argument in Tesseract's `eng+por` form.
    pub fn language_arg(&self) -> String {
        self.languages.join("+")
    }
}

/// Default Tesseract location for the build platform.
///
/// The Windows installer does not put Tesseract on `PATH`.
pub fn default_tesseract_cmd() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from(r"C:\Program Files\Tesseract-OCR\tesseract.exe")
    } else {
        PathBuf::from("tesseract")
    }
}

/// PDF rasterization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Poppler pdftoppm binary.
    pub pdftoppm_cmd: PathBuf,

    /// DPI for rendering PDF pages to images.
    pub render_dpi: u32,

    /// Directory receiving the temporary `page_<n>.png` files.
    pub work_dir: PathBuf,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            pdftoppm_cmd: PathBuf::from("pdftoppm"),
            render_dpi: 200,
            work_dir: PathBuf::from("."),
        }
    }
}

/// Which match is kept when several lines hit the same key field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Later lines overwrite earlier ones.
    #[default]
    LastWins,
    /// The first matching line is kept.
    FirstWins,
}

/// Key-field recognition configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub policy: MatchPolicy,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving `output.<format>`.
    pub output_dir: PathBuf,

    /// PDF output layout.
    pub pdf: PdfOutputConfig,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            pdf: PdfOutputConfig::default(),
        }
    }
}

/// Layout of the PDF output, in points.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfOutputConfig {
    /// Baseline of the first line, measured from the page bottom.
    pub start_y: f32,

    /// Distance between consecutive baselines.
    pub line_height: f32,

    /// Left edge of every line.
    pub left_margin: f32,

    /// Helvetica font size.
    pub font_size: f32,

    /// Start a new page instead of drawing below the page bottom.
    pub paginate: bool,
}

impl Default for PdfOutputConfig {
    fn default() -> Self {
        Self {
            start_y: 800.0,
            line_height: 15.0,
            left_margin: 50.0,
            font_size: 12.0,
            paginate: false,
        }
    }
}

impl OcrDocConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Check every section for values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), OcrDocError> {
        self.preprocess.validate()?;
        if self.engine.languages.is_empty() {
            return Err(OcrDocError::Config(
                "engine.languages must name at least one language".to_string(),
            ));
        }
        if self.pdf.render_dpi == 0 {
            return Err(OcrDocError::Config(
                "pdf.render_dpi must be greater than zero".to_string(),
            ));
        }
        if self.output.pdf.line_height <= 0.0 {
            return Err(OcrDocError::Config(
                "output.pdf.line_height must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
