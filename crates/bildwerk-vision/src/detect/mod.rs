// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Detection module — circle detection and the smoothing applied before it.

pub mod hough;

use image::{GrayImage, RgbImage};
use imageproc::filter::median_filter;

/// Convert to single-channel intensity and apply a `kernel` x `kernel` median
/// filter. Kernels below 3 skip the filter.
pub fn prepare_for_detection(image: &RgbImage, kernel: u32) -> GrayImage {
    let gray = image::DynamicImage::ImageRgb8(image.clone()).into_luma8();
    if kernel < 3 {
        return gray;
    }
    let radius = kernel / 2;
    median_filter(&gray, radius, radius)
}
