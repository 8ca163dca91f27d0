//! Image preprocessing for OCR.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage};
use imageproc::filter::{box_filter, separable_filter_equal};
use tracing::debug;

use crate::error::OcrError;
use crate::models::config::{PreprocessConfig, ThresholdMethod};

/// Turns a raster scan into a strictly black/white image for the engine.
///
/// Steps run in a fixed order: grayscale, bilinear upscale, Gaussian blur,
/// adaptive thresholding. The constants come from [`PreprocessConfig`].
pub struct ImagePreprocessor {
    config: PreprocessConfig,
}

impl ImagePreprocessor {
    /// Create a preprocessor with the given constants.
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    /// Load an image file and preprocess it.
    pub fn open(&self, path: &Path) -> crate::Result<GrayImage> {
        let image = image::open(path)?;
        Ok(self.preprocess(&image)?)
    }

    /// Run the full cleanup pipeline on a decoded image.
    pub fn preprocess(&self, image: &DynamicImage) -> Result<GrayImage, OcrError> {
        let gray = image.to_luma8();
        let (width, height) = gray.dimensions();
        if width == 0 || height == 0 {
            return Err(OcrError::Preprocessing(format!(
                "image has no pixels ({}x{})",
                width, height
            )));
        }

        let upscaled = self.upscale(&gray);
        let blurred = self.blur(&upscaled);
        let binary = self.adaptive_threshold(&blurred);

        debug!(
            "Preprocessed {}x{} -> {}x{}",
            width,
            height,
            binary.width(),
            binary.height()
        );

        Ok(binary)
    }

    fn upscale(&self, image: &GrayImage) -> GrayImage {
        let (width, height) = image.dimensions();
        let new_width = scaled_dimension(width, self.config.scale);
        let new_height = scaled_dimension(height, self.config.scale);

        if (new_width, new_height) == (width, height) {
            return image.clone();
        }

        // Triangle is bilinear interpolation
        imageops::resize(image, new_width, new_height, FilterType::Triangle)
    }

    fn blur(&self, image: &GrayImage) -> GrayImage {
        if self.config.blur_kernel <= 1 {
            return image.clone();
        }
        separable_filter_equal(image, &gaussian_kernel(self.config.blur_kernel))
    }

    fn adaptive_threshold(&self, image: &GrayImage) -> GrayImage {
        let local_mean = match self.config.threshold_method {
            ThresholdMethod::Gaussian => {
                separable_filter_equal(image, &gaussian_kernel(self.config.threshold_block))
            }
            ThresholdMethod::Mean => {
                let radius = self.config.threshold_block / 2;
                box_filter(image, radius, radius)
            }
        };

        let offset = self.config.threshold_offset;
        let mut output = GrayImage::new(image.width(), image.height());

        for ((out, src), mean) in output
            .pixels_mut()
            .zip(image.pixels())
            .zip(local_mean.pixels())
        {
            let threshold = mean.0[0] as i32 - offset;
            out.0[0] = if src.0[0] as i32 > threshold { 255 } else { 0 };
        }

        output
    }
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new(PreprocessConfig::default())
    }
}

/// Gaussian sigma for a `k`x`k` kernel, using OpenCV's rule for sigma = 0.
pub fn kernel_sigma(kernel: u32) -> f32 {
    0.3 * ((kernel as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalized 1-D Gaussian weights with exactly `size` taps.
pub fn gaussian_kernel(size: u32) -> Vec<f32> {
    let sigma = kernel_sigma(size);
    let center = (size / 2) as f32;

    let weights: Vec<f32> = (0..size)
        .map(|i| {
            let d = i as f32 - center;
            (-(d * d) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f32 = weights.iter().sum();

    weights.into_iter().map(|w| w / sum).collect()
}

fn scaled_dimension(size: u32, scale: f32) -> u32 {
    ((size as f32 * scale).round() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma};
    use pretty_assertions::assert_eq;

    /// White page with a three pixel wide black stroke across the middle.
    fn stroke_image() -> DynamicImage {
        let mut image = GrayImage::from_pixel(60, 60, Luma([255]));
        for y in 28..31 {
            for x in 10..50 {
                image.put_pixel(x, y, Luma([0]));
            }
        }
        DynamicImage::ImageLuma8(image)
    }

    #[test]
    fn test_kernel_sigma() {
        assert!((kernel_sigma(5) - 1.1).abs() < 1e-5);
        assert!((kernel_sigma(31) - 5.0).abs() < 1e-5);
        assert!((kernel_sigma(3) - 0.8).abs() < 1e-5);
    }

    #[test]
    fn test_gaussian_kernel_is_normalized_and_symmetric() {
        let kernel = gaussian_kernel(5);
        assert_eq!(kernel.len(), 5);
        assert!((kernel.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        assert!((kernel[0] - kernel[4]).abs() < 1e-7);
        assert!(kernel[2] > kernel[1] && kernel[1] > kernel[0]);
    }

    #[test]
    fn test_blur_spreads_over_kernel_width() {
        let mut image = GrayImage::new(21, 21);
        image.put_pixel(10, 10, Luma([255]));

        let blurred = ImagePreprocessor::default().blur(&image);
        let spread = (0..21).filter(|&x| blurred.get_pixel(x, 10).0[0] > 0).count();
        assert_eq!(spread, 5);
    }

    #[test]
    fn test_gaussian_windows_match_configured_sizes() {
        let config = PreprocessConfig::default();

        for size in [config.blur_kernel, config.threshold_block] {
            let mut row: ImageBuffer<Luma<f32>, Vec<f32>> = ImageBuffer::new(61, 1);
            row.put_pixel(30, 0, Luma([1.0]));

            let filtered = separable_filter_equal(&row, &gaussian_kernel(size));
            let spread = filtered.pixels().filter(|p| p.0[0] > 0.0).count();
            assert_eq!(spread as u32, size);
        }
    }

    #[test]
    fn test_upscales_by_one_and_a_half() {
        let preprocessor = ImagePreprocessor::default();
        let output = preprocessor.preprocess(&stroke_image()).unwrap();
        assert_eq!(output.dimensions(), (90, 90));
    }

    #[test]
    fn test_output_is_binary() {
        let preprocessor = ImagePreprocessor::default();
        let output = preprocessor.preprocess(&stroke_image()).unwrap();
        assert!(output.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    }

    #[test]
    fn test_stroke_stays_black_background_turns_white() {
        let preprocessor = ImagePreprocessor::default();
        let output = preprocessor.preprocess(&stroke_image()).unwrap();

        assert_eq!(output.get_pixel(45, 44).0[0], 0);
        assert_eq!(output.get_pixel(45, 10).0[0], 255);
        assert_eq!(output.get_pixel(5, 80).0[0], 255);
    }

    #[test]
    fn test_mean_method_keeps_stroke() {
        let config = PreprocessConfig {
            threshold_method: ThresholdMethod::Mean,
            ..PreprocessConfig::default()
        };
        let output = ImagePreprocessor::new(config)
            .preprocess(&stroke_image())
            .unwrap();

        assert_eq!(output.get_pixel(45, 44).0[0], 0);
        assert_eq!(output.get_pixel(45, 10).0[0], 255);
    }

    #[test]
    fn test_color_input_is_accepted() {
        let rgb = image::RgbImage::from_pixel(20, 10, image::Rgb([200, 180, 160]));
        let output = ImagePreprocessor::default()
            .preprocess(&DynamicImage::ImageRgb8(rgb))
            .unwrap();
        assert_eq!(output.dimensions(), (30, 15));
    }

    #[test]
    fn test_unit_scale_keeps_size() {
        let config = PreprocessConfig {
            scale: 1.0,
            ..PreprocessConfig::default()
        };
        let output = ImagePreprocessor::new(config)
            .preprocess(&stroke_image())
            .unwrap();
        assert_eq!(output.dimensions(), (60, 60));
    }
}
