// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster loading and saving, plus the flips, same-canvas rotation, scaling
// and brightness edits used by the augmentation set.

use std::path::Path;

use bildwerk_core::error::BildwerkError;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, Rgb, RgbImage};
use imageproc::geometric_transformations::{self, Interpolation};
use tracing::{debug, instrument};

/// One decoded image plus the chainable edits the augmentation set needs.
/// Every edit takes `self` by value and hands back the edited image.
///
/// ```ignore
/// let brighter = ImageProcessor::open("coins.png")?
///     .flip_horizontal()
///     .adjust_brightness(50)
///     .into_rgb8();
/// ```
pub struct ImageProcessor {
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path. The format is sniffed from the file
    /// contents, falling back to the extension.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BildwerkError> {
        let path = path.as_ref();
        let decode_error = |reason: String| BildwerkError::ImageDecode {
            path: path.display().to_string(),
            reason,
        };
        let img = ImageReader::open(path)
            .map_err(|err| decode_error(err.to_string()))?
            .with_guessed_format()
            .map_err(|err| decode_error(err.to_string()))?
            .decode()
            .map_err(|err| decode_error(err.to_string()))?;
        debug!(width = img.width(), height = img.height(), "Image loaded");
        Ok(Self { image: img })
    }

    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Wrap a three-channel buffer.
    pub fn from_rgb(image: RgbImage) -> Self {
        Self {
            image: DynamicImage::ImageRgb8(image),
        }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// The image as decoded, before any conversion.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the processor and return a three-channel buffer.
    pub fn into_rgb8(self) -> RgbImage {
        self.image.into_rgb8()
    }

    // -- Edits ----------------------------------------------------------------

    pub fn flip_horizontal(self) -> Self {
        Self {
            image: self.image.fliph(),
        }
    }

    pub fn flip_vertical(self) -> Self {
        Self {
            image: self.image.flipv(),
        }
    }

    /// Rotate counter-clockwise by `degrees` about the image center, keeping
    /// the canvas size. Uncovered pixels are black.
    #[instrument(skip(self), fields(degrees))]
    pub fn rotate_in_place(self, degrees: f32) -> Self {
        let rgb = self.image.into_rgb8();
        // imageproc rotates clockwise for positive angles.
        let rotated = geometric_transformations::rotate_about_center(
            &rgb,
            -degrees.to_radians(),
            Interpolation::Bilinear,
            Rgb([0u8, 0, 0]),
        );
        Self::from_rgb(rotated)
    }

    /// Scale both axes by `factor` with bilinear filtering. The result is at
    /// least one pixel in each dimension.
    #[instrument(skip(self), fields(factor))]
    pub fn scale(self, factor: f32) -> Self {
        let width = ((self.image.width() as f32 * factor).round() as u32).max(1);
        let height = ((self.image.height() as f32 * factor).round() as u32).max(1);
        debug!(width, height, "Scaling image");
        Self {
            image: self.image.resize_exact(width, height, FilterType::Triangle),
        }
    }

    /// Add `value` (-255..=255) to every channel, saturating at 0 and 255.
    #[instrument(skip(self), fields(value))]
    pub fn adjust_brightness(self, value: i32) -> Self {
        let clamped = value.clamp(-255, 255);
        let rgb = self.image.into_rgb8();

        let brightened = image::ImageBuffer::from_fn(rgb.width(), rgb.height(), |x, y| {
            let Rgb([r, g, b]) = *rgb.get_pixel(x, y);
            let adjust = |channel: u8| -> u8 { (channel as i32 + clamped).clamp(0, 255) as u8 };
            Rgb([adjust(r), adjust(g), adjust(b)])
        });
        Self::from_rgb(brightened)
    }

    /// Multiply every channel by `factor`, saturating at 255.
    #[instrument(skip(self), fields(factor))]
    pub fn scale_intensity(self, factor: f32) -> Self {
        let rgb = self.image.into_rgb8();

        let scaled = image::ImageBuffer::from_fn(rgb.width(), rgb.height(), |x, y| {
            let Rgb([r, g, b]) = *rgb.get_pixel(x, y);
            let adjust = |channel: u8| -> u8 { (channel as f32 * factor).clamp(0.0, 255.0) as u8 };
            Rgb([adjust(r), adjust(g), adjust(b)])
        });
        Self::from_rgb(scaled)
    }

    // -- Output ---------------------------------------------------------------

    /// Encode to `path`; the extension picks the format.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), BildwerkError> {
        let path = path.as_ref();
        self.image
            .save(path)
            .map_err(|err| BildwerkError::ImageEncode {
                path: path.display().to_string(),
                reason: err.to_string(),
            })
    }
}
