// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Annotation — draws detected circles onto a copy of the source image.

pub mod glyphs;

use bildwerk_core::Circle;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut};
use tracing::{debug, instrument};

pub const OUTLINE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const CENTER_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
pub const LABEL_COLOR: Rgb<u8> = Rgb([0, 0, 255]);

const OUTLINE_THICKNESS: i32 = 2;
const CENTER_MARKER_RADIUS: i32 = 3;
const LABEL_SCALE: u32 = 2;
/// Label baseline offset from the circle center.
const LABEL_OFFSET: (i32, i32) = (-20, -10);

/// Text drawn next to a circle.
pub fn radius_label(circle: &Circle) -> String {
    format!("R={}", circle.pixel_radius())
}

/// Return a copy of `image` with an outline, a filled center marker and a
/// radius label for every circle. An empty slice returns an unmodified copy.
#[instrument(skip_all, fields(circles = circles.len()))]
pub fn annotate_circles(image: &RgbImage, circles: &[Circle]) -> RgbImage {
    let mut canvas = image.clone();
    for circle in circles {
        let center = circle.pixel_center();
        let radius = circle.pixel_radius();

        for offset in 0..OUTLINE_THICKNESS {
            draw_hollow_circle_mut(&mut canvas, center, radius + offset, OUTLINE_COLOR);
        }
        draw_filled_circle_mut(&mut canvas, center, CENTER_MARKER_RADIUS, CENTER_COLOR);

        // The label offset names the bottom-left of the text.
        let text_height = (glyphs::GLYPH_HEIGHT * LABEL_SCALE) as i32;
        let origin = (
            center.0 + LABEL_OFFSET.0,
            center.1 + LABEL_OFFSET.1 - text_height,
        );
        glyphs::draw_text(&mut canvas, &radius_label(circle), origin, LABEL_SCALE, LABEL_COLOR);
    }
    debug!("Annotations drawn");
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_circles_leaves_image_untouched() {
        let img = RgbImage::from_pixel(30, 30, Rgb([12, 34, 56]));
        assert_eq!(annotate_circles(&img, &[]), img);
    }

    #[test]
    fn label_uses_rounded_radius() {
        assert_eq!(radius_label(&Circle::new(0.0, 0.0, 41.6)), "R=42");
    }

    #[test]
    fn draws_outline_marker_and_label() {
        let img = RgbImage::from_pixel(200, 200, Rgb([0, 0, 0]));
        let circle = Circle::new(100.0, 100.0, 50.0);
        let out = annotate_circles(&img, &[circle]);

        assert_eq!(*out.get_pixel(150, 100), OUTLINE_COLOR);
        assert_eq!(*out.get_pixel(100, 100), CENTER_COLOR);
        let label_pixels = out.pixels().filter(|p| **p == LABEL_COLOR).count();
        assert!(label_pixels > 0);
        // The source image is not modified.
        assert_eq!(*img.get_pixel(150, 100), Rgb([0, 0, 0]));
    }

    #[test]
    fn label_bottom_left_sits_at_offset() {
        let img = RgbImage::from_pixel(200, 200, Rgb([0, 0, 0]));
        let out = annotate_circles(&img, &[Circle::new(100.0, 100.0, 50.0)]);

        // "R=50" at scale 2: four 5-px glyphs with 1-px gaps, 7 px tall.
        let (left, bottom) = (100 - 20, 100 - 10);
        let (right, top) = (left + (4 * 6 - 1) * 2, bottom - 7 * 2);
        let label: Vec<(u32, u32)> = out
            .enumerate_pixels()
            .filter(|(_, _, p)| **p == LABEL_COLOR)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!label.is_empty());
        for (x, y) in label {
            assert!((left..right).contains(&x) && (top..bottom).contains(&y), "label pixel at {x},{y}");
        }
    }

    #[test]
    fn circles_near_the_border_are_clipped() {
        let img = RgbImage::new(40, 40);
        let out = annotate_circles(&img, &[Circle::new(2.0, 2.0, 30.0)]);
        assert_eq!(out.dimensions(), (40, 40));
    }
}
