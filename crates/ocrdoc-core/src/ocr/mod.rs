//! Image cleanup and text recognition.

mod engine;
mod preprocessing;

pub use engine::{TesseractEngine, TextRecognizer};
pub use preprocessing::{ImagePreprocessor, gaussian_kernel, kernel_sigma};
