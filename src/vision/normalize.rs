// Image normalization: downscale into a bounding box and re-encode as JPEG
// Author: kelexine (https://github.com/kelexine)

use super::models::{validate_image_size, NormalizedImage, SourceImage};
use crate::config::NormalizerConfig;
use crate::error::{DiagnosisError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use std::time::Instant;
use tracing::{debug, error};

/// Compute output dimensions for a `width`x`height` image fitted into
/// `max_width`x`max_height`.
///
/// Images already inside the box are returned unchanged (no upscaling).
/// Otherwise the aspect ratio is kept and the limiting side lands exactly on
/// its bound; the other side is rounded and never drops below 1px.
pub fn plan_dimensions(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width <= max_width && height <= max_height {
        return (width, height);
    }

    let scale = f64::min(
        max_width as f64 / width as f64,
        max_height as f64 / height as f64,
    );

    let fit = |side: u32, bound: u32| -> u32 {
        let scaled = (side as f64 * scale).round() as u32;
        scaled.max(1).min(bound.max(1))
    };

    (fit(width, max_width), fit(height, max_height))
}

/// Downscales and re-encodes source images before upload.
#[derive(Debug, Clone)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(NormalizerConfig::default())
    }
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Decode, resize and JPEG-encode `source`.
    ///
    /// CPU-bound; async callers should prefer [`Normalizer::normalize_blocking`].
    pub fn normalize(&self, source: &SourceImage) -> Result<NormalizedImage> {
        let start = Instant::now();

        validate_image_size(source.data.len()).map_err(DiagnosisError::Decoding)?;

        let decoded = image::load_from_memory(&source.data).map_err(|e| {
            error!("Failed to decode {}: {}", source.name, e);
            DiagnosisError::Decoding(format!("{}: {}", source.name, e))
        })?;

        let (src_w, src_h) = decoded.dimensions();
        if src_w == 0 || src_h == 0 {
            return Err(DiagnosisError::Decoding(format!(
                "{} has zero-sized dimensions",
                source.name
            )));
        }

        let (out_w, out_h) =
            plan_dimensions(src_w, src_h, self.config.max_width, self.config.max_height);

        let resized = if (out_w, out_h) == (src_w, src_h) {
            decoded
        } else {
            decoded.resize_exact(out_w, out_h, FilterType::Triangle)
        };

        let data = encode_jpeg(&resized, self.config.jpeg_quality)?;

        let elapsed = start.elapsed();
        debug!(
            "Normalized {} {}x{} ({} bytes) -> {}x{} ({} bytes) in {:?}",
            source.name,
            src_w,
            src_h,
            source.data.len(),
            out_w,
            out_h,
            data.len(),
            elapsed
        );
        crate::metrics::record_normalization(source.data.len(), data.len(), elapsed.as_secs_f64());

        Ok(NormalizedImage {
            name: source.name.clone(),
            width: out_w,
            height: out_h,
            data,
        })
    }

    /// Run [`Normalizer::normalize`] on the blocking thread pool.
    pub async fn normalize_blocking(&self, source: SourceImage) -> Result<NormalizedImage> {
        let normalizer = self.clone();
        tokio::task::spawn_blocking(move || normalizer.normalize(&source))
            .await
            .map_err(|e| DiagnosisError::Internal(format!("Normalization task failed: {}", e)))?
    }
}

/// JPEG has no alpha channel, so the raster is flattened to RGB first.
fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());

    let mut buffer = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buffer, quality))
        .map_err(|e| DiagnosisError::Encoding(e.to_string()))?;

    if buffer.is_empty() {
        return Err(DiagnosisError::Encoding(
            "JPEG encoder produced no output".to_string(),
        ));
    }
    Ok(buffer)
}
