// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the bildwerk-vision crate. Covers the circle
// detector on a synthetic image and the pencil sketch effect.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use imageproc::drawing::draw_filled_circle_mut;

use bildwerk_core::{HoughCircleParams, SketchOptions};
use bildwerk_vision::{detect_circles, pencil_sketch};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Benchmark circle detection on a 320x240 image with three filled discs,
/// using the batch detector constants.
fn bench_detect_circles(c: &mut Criterion) {
    let mut img = GrayImage::from_pixel(320, 240, Luma([30u8]));
    draw_filled_circle_mut(&mut img, (70, 80), 40, Luma([220u8]));
    draw_filled_circle_mut(&mut img, (200, 120), 60, Luma([220u8]));
    draw_filled_circle_mut(&mut img, (280, 200), 25, Luma([220u8]));

    let params = HoughCircleParams {
        min_dist: 240.0 / 8.0,
        ..HoughCircleParams::default()
    };

    c.bench_function("detect_circles (320x240, 3 discs)", |b| {
        b.iter(|| {
            let circles = detect_circles(black_box(&img), &params);
            black_box(circles.ok());
        });
    });
}

/// Benchmark the colour sketch with the default 21-pixel kernel.
fn bench_pencil_sketch(c: &mut Criterion) {
    let rgb = RgbImage::from_fn(256, 256, |x, y| Rgb([x as u8, y as u8, (x ^ y) as u8]));
    let image = DynamicImage::ImageRgb8(rgb);
    let options = SketchOptions::default();

    c.bench_function("pencil_sketch colour (256x256)", |b| {
        b.iter(|| {
            let sketch = pencil_sketch(black_box(&image), &options);
            black_box(sketch.ok());
        });
    });
}

criterion_group!(benches, bench_detect_circles, bench_pencil_sketch);
criterion_main!(benches);
