// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pencil sketch effect — colour dodge of an intensity channel against its
// blurred inverse. The grayscale variant works on luma; the colour variant
// works on the HSV value channel and keeps hue.

use bildwerk_core::SketchOptions;
use bildwerk_core::error::BildwerkError;
use image::{DynamicImage, GrayImage, Luma, RgbImage};
use imageproc::filter::gaussian_blur_f32;
use tracing::{debug, instrument};

use crate::raster::color::{hsv_to_rgb, rgb_to_hsv};

/// Saturation multiplier applied by the colour sketch.
const COLOR_SATURATION_SCALE: f32 = 0.9;

/// Apply the pencil sketch effect described by `options`.
///
/// Returns a `Luma8` image for the grayscale variant and an `Rgb8` image for
/// the colour one. An even `blur_kernel` is rejected with
/// `BildwerkError::InvalidParameter`.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn pencil_sketch(
    image: &DynamicImage,
    options: &SketchOptions,
) -> Result<DynamicImage, BildwerkError> {
    options.validate()?;

    let sketch = if options.color {
        DynamicImage::ImageRgb8(sketch_color(&image.to_rgb8(), options.blur_kernel))
    } else {
        DynamicImage::ImageLuma8(sketch_gray(&image.to_luma8(), options.blur_kernel))
    };
    debug!(color = options.color, "Sketch complete");
    Ok(sketch)
}

/// Gaussian sigma for a kernel size, matching the usual automatic choice
/// `0.3 * ((k - 1) * 0.5 - 1) + 0.8`.
pub fn sigma_for_kernel(kernel: u32) -> f32 {
    0.3 * ((kernel as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

fn sketch_gray(gray: &GrayImage, kernel: u32) -> GrayImage {
    dodge(gray, kernel)
}

fn sketch_color(rgb: &RgbImage, kernel: u32) -> RgbImage {
    let hsv: Vec<_> = rgb.pixels().map(|p| rgb_to_hsv(*p)).collect();
    let value = GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let v = hsv[(y * rgb.width() + x) as usize].v;
        Luma([(v * 255.0).round() as u8])
    });
    let sketched_value = dodge(&value, kernel);

    RgbImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let mut pixel = hsv[(y * rgb.width() + x) as usize];
        // Saturation is quantised to a byte before scaling, then truncated.
        let s_byte = (pixel.s * 255.0).round();
        pixel.s = (s_byte * COLOR_SATURATION_SCALE).floor() / 255.0;
        pixel.v = sketched_value.get_pixel(x, y).0[0] as f32 / 255.0;
        hsv_to_rgb(pixel)
    })
}

/// `channel * 255 / (255 - blur(255 - channel))`, saturating at 255. A zero
/// divisor yields zero.
fn dodge(channel: &GrayImage, kernel: u32) -> GrayImage {
    let mut inverted = channel.clone();
    image::imageops::invert(&mut inverted);
    let blurred = if kernel > 1 {
        gaussian_blur_f32(&inverted, sigma_for_kernel(kernel))
    } else {
        inverted
    };

    GrayImage::from_fn(channel.width(), channel.height(), |x, y| {
        let base = channel.get_pixel(x, y).0[0] as u32;
        let divisor = 255 - blurred.get_pixel(x, y).0[0] as u32;
        if divisor == 0 {
            return Luma([0]);
        }
        let value = ((base * 255) as f32 / divisor as f32).round();
        Luma([value.min(255.0) as u8])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn options(color: bool, blur_kernel: u32) -> SketchOptions {
        SketchOptions {
            color,
            blur_kernel,
            save: false,
        }
    }

    #[test]
    fn sigma_matches_kernel_rule() {
        assert!((sigma_for_kernel(21) - 3.5).abs() < 1e-6);
        assert!((sigma_for_kernel(3) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn even_kernel_is_rejected() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        let err = pencil_sketch(&img, &options(false, 4)).err().expect("should fail");
        assert!(matches!(err, BildwerkError::InvalidParameter(_)));
    }

    #[test]
    fn flat_image_sketches_to_near_white() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, Rgb([120, 120, 120])));
        let out = pencil_sketch(&img, &options(false, 5)).expect("sketch");
        let gray = out.as_luma8().expect("grayscale output");
        assert!(gray.pixels().all(|p| p.0[0] >= 250));
    }

    #[test]
    fn black_pixels_stay_black() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([0, 0, 0])));
        let out = pencil_sketch(&img, &options(false, 3)).expect("sketch");
        assert!(out.as_luma8().expect("luma").pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn dark_line_survives_on_light_background() {
        let mut rgb = RgbImage::from_pixel(40, 40, Rgb([230, 230, 230]));
        for y in 0..40 {
            rgb.put_pixel(20, y, Rgb([20, 20, 20]));
        }
        let out = pencil_sketch(&DynamicImage::ImageRgb8(rgb), &options(false, 7)).expect("sketch");
        let gray = out.as_luma8().expect("luma");
        assert!(gray.get_pixel(20, 20).0[0] < 128);
        assert!(gray.get_pixel(2, 20).0[0] >= 250);
    }

    #[test]
    fn color_sketch_keeps_hue_and_size() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(12, 10, Rgb([200, 40, 40])));
        let out = pencil_sketch(&img, &options(true, 5)).expect("sketch");
        let rgb = out.as_rgb8().expect("rgb output");
        assert_eq!(rgb.dimensions(), (12, 10));
        let Rgb([r, g, b]) = *rgb.get_pixel(6, 5);
        assert!(r > g && r > b, "hue drifted: {r},{g},{b}");
    }
}
