// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Snapshot processor — turns a decoded page image into a `RasterSnapshot`:
// flatten transparency onto a background colour and apply the capture scale.

use image::imageops::FilterType;
use image::{DynamicImage, Rgb, RgbImage};
use snapfolio_core::error::{ExportError, Result};
use snapfolio_core::types::{Color, RasterSnapshot};
use tracing::{debug, info, instrument};

/// Processing pipeline for a single captured page image.
///
/// Each step consumes `self` and returns a new processor, enabling chaining:
///
/// ```ignore
/// let snapshot = SnapshotProcessor::open("minutes.png")?
///     .flatten(Color::WHITE)
///     .scale(2.0)
///     .into_snapshot();
/// ```
pub struct SnapshotProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl SnapshotProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let img = image::open(path.as_ref()).map_err(|err| {
            ExportError::ImageError(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        info!(width = img.width(), height = img.height(), "Image loaded");
        Ok(Self { image: img })
    }

    /// Create a processor from encoded bytes (PNG, JPEG, ...).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data)
            .map_err(|err| ExportError::ImageError(format!("failed to decode image: {}", err)))?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    // -- Transformations ------------------------------------------------------

    /// Composite every pixel over `background`, dropping the alpha channel.
    pub fn flatten(self, background: Color) -> Self {
        if !self.image.color().has_alpha() {
            return self;
        }
        let rgba = self.image.to_rgba8();
        let mut out = RgbImage::new(rgba.width(), rgba.height());
        let bg = [background.r, background.g, background.b];
        for (src, dst) in rgba.pixels().zip(out.pixels_mut()) {
            let alpha = u16::from(src.0[3]);
            let mut blended = [0u8; 3];
            for channel in 0..3 {
                let fg = u16::from(src.0[channel]);
                let back = u16::from(bg[channel]);
                blended[channel] = ((fg * alpha + back * (255 - alpha) + 127) / 255) as u8;
            }
            *dst = Rgb(blended);
        }
        debug!("Flattened alpha onto background");
        Self {
            image: DynamicImage::ImageRgb8(out),
        }
    }

    /// Resample by `factor` (2.0 doubles both dimensions). Uses Lanczos3.
    ///
    /// Non-positive or non-finite factors leave the image untouched.
    pub fn scale(self, factor: f32) -> Self {
        if !(factor.is_finite() && factor > 0.0) || (factor - 1.0).abs() < f32::EPSILON {
            return self;
        }
        if self.image.width() == 0 || self.image.height() == 0 {
            return self;
        }
        let width = ((self.image.width() as f32) * factor).round().max(1.0) as u32;
        let height = ((self.image.height() as f32) * factor).round().max(1.0) as u32;
        info!(
            from_w = self.image.width(),
            from_h = self.image.height(),
            width,
            height,
            "Scaling snapshot"
        );
        let resized = self.image.resize_exact(width, height, FilterType::Lanczos3);
        Self { image: resized }
    }

    // -- Output ---------------------------------------------------------------

    /// Freeze into an immutable snapshot.
    pub fn into_snapshot(self) -> RasterSnapshot {
        RasterSnapshot::from_dynamic(self.image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn translucent(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0])))
    }

    #[test]
    fn transparent_pixels_take_background() {
        let snapshot = SnapshotProcessor::from_dynamic(translucent(2, 2))
            .flatten(Color::rgb(10, 20, 30))
            .into_snapshot();
        assert_eq!(snapshot.pixels().get_pixel(1, 1).0, [10, 20, 30]);
    }

    #[test]
    fn half_alpha_blends() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 128]));
        let snapshot = SnapshotProcessor::from_dynamic(DynamicImage::ImageRgba8(img))
            .flatten(Color::WHITE)
            .into_snapshot();
        let value = snapshot.pixels().get_pixel(0, 0).0[0];
        assert!((126..=128).contains(&value));
    }

    #[test]
    fn scale_doubles_dimensions() {
        let processor = SnapshotProcessor::from_dynamic(translucent(10, 7)).scale(2.0);
        assert_eq!((processor.width(), processor.height()), (20, 14));
    }

    #[test]
    fn invalid_scale_is_ignored() {
        let processor = SnapshotProcessor::from_dynamic(translucent(10, 7)).scale(-1.0);
        assert_eq!(processor.width(), 10);
    }

    #[test]
    fn undecodable_bytes_are_image_errors() {
        assert!(matches!(
            SnapshotProcessor::from_bytes(b"definitely not a png"),
            Err(ExportError::ImageError(_))
        ));
    }
}
