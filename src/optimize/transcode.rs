//! Resizing and WebP re-encoding of a single image

use crate::optimize::OptimizeOptions;
use crate::OptimizeError;
use image::imageops::FilterType;
use image::DynamicImage;
use std::fs;
use std::path::{Path, PathBuf};

/// libwebp effort level, slowest and smallest
const ENCODE_METHOD: i32 = 6;

/// Inflation applied to quality-only size estimates
const QUALITY_ONLY_FACTOR: f64 = 1.1;

/// Result of optimizing (or estimating) one image
#[derive(Debug, Clone, PartialEq)]
pub struct ImageOutcome {
    pub path: PathBuf,
    /// Size before, in bytes
    pub original_size: u64,
    /// Size after in bytes; an estimate when `estimated` is set
    pub new_size: u64,
    pub original_dimensions: (u32, u32),
    pub new_dimensions: (u32, u32),
    /// Quality the image was (or would be) encoded at
    pub quality: u8,
    pub estimated: bool,
}

impl ImageOutcome {
    pub fn was_resized(&self) -> bool {
        self.original_dimensions != self.new_dimensions
    }

    /// Bytes saved; negative when the file grew
    pub fn savings(&self) -> i64 {
        self.original_size as i64 - self.new_size as i64
    }

    pub fn savings_pct(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        self.savings() as f64 / self.original_size as f64 * 100.0
    }
}

/// Dimensions after capping the width at `max_width`, keeping the aspect ratio
///
/// The height is floored. Images already within the limit are unchanged.
pub fn target_dimensions(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width {
        return (width, height);
    }
    let new_height = u64::from(height) * u64::from(max_width) / u64::from(width);
    (max_width, (new_height as u32).max(1))
}

/// Heuristic size estimate for dry runs
///
/// Scales by the pixel-count ratio and the quality fraction when resizing,
/// otherwise by the quality fraction plus ten percent. This is a rough
/// approximation, not a prediction of the encoder's output.
pub fn estimate_size(original_size: u64, from: (u32, u32), to: (u32, u32), quality: u8) -> u64 {
    let quality = f64::from(quality) / 100.0;
    let original = original_size as f64;

    let estimate = if from != to {
        let from_pixels = f64::from(from.0) * f64::from(from.1);
        let to_pixels = f64::from(to.0) * f64::from(to.1);
        original * (to_pixels / from_pixels) * quality
    } else {
        original * quality * QUALITY_ONLY_FACTOR
    };

    estimate.round() as u64
}

/// Optimizes one image in place
///
/// In dry-run mode only the header is read, the file is left untouched and
/// the new size is estimated.
pub fn optimize_image(path: &Path, options: &OptimizeOptions) -> Result<ImageOutcome, OptimizeError> {
    let original_size = fs::metadata(path)?.len();

    if options.dry_run {
        let (width, height) = image::image_dimensions(path)?;
        let target = target_dimensions(width, height, options.max_width);
        return Ok(ImageOutcome {
            path: path.to_path_buf(),
            original_size,
            new_size: estimate_size(original_size, (width, height), target, options.quality),
            original_dimensions: (width, height),
            new_dimensions: target,
            quality: options.quality,
            estimated: true,
        });
    }

    let img = image::open(path)?;
    let original_dimensions = (img.width(), img.height());
    let (width, height) = target_dimensions(img.width(), img.height(), options.max_width);

    let img = if (width, height) != original_dimensions {
        tracing::debug!(
            "Resizing {} from {}x{} to {}x{}",
            path.display(),
            original_dimensions.0,
            original_dimensions.1,
            width,
            height
        );
        img.resize_exact(width, height, FilterType::Lanczos3)
    } else {
        img
    };

    let encoded = encode_webp(&img, options.quality)?;
    fs::write(path, &encoded)?;

    Ok(ImageOutcome {
        path: path.to_path_buf(),
        original_size,
        new_size: fs::metadata(path)?.len(),
        original_dimensions,
        new_dimensions: (width, height),
        quality: options.quality,
        estimated: false,
    })
}

/// Encodes lossy WebP at `quality` with maximum effort
pub fn encode_webp(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, OptimizeError> {
    let rgba = img.to_rgba8();
    let encoder = webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height());

    let mut config = webp::WebPConfig::new()
        .map_err(|_| OptimizeError::Encode("failed to initialize encoder config".to_string()))?;
    config.quality = f32::from(quality);
    config.method = ENCODE_METHOD;

    let memory = encoder
        .encode_advanced(&config)
        .map_err(|e| OptimizeError::Encode(format!("{:?}", e)))?;

    Ok(memory.to_vec())
}
