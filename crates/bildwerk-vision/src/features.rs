// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Keypoint matching — FAST-9 corners described with BRIEF, matched by
// brute-force Hamming distance, and drawn side by side.

use bildwerk_core::error::BildwerkError;
use image::{GrayImage, Rgb, RgbImage};
use imageproc::binary_descriptors::BinaryDescriptor;
use imageproc::binary_descriptors::brief::{BriefDescriptor, TestPair, brief};
use imageproc::corners::corners_fast9;
use imageproc::drawing::{draw_hollow_circle_mut, draw_line_segment_mut};
use imageproc::point::Point;
use tracing::{debug, info, instrument};

/// Tuning for keypoint detection and description.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOptions {
    /// FAST intensity threshold.
    pub fast_threshold: u8,
    /// Strongest corners kept per image.
    pub max_keypoints: usize,
    /// Corners closer than this to any edge are discarded (BRIEF patch radius).
    pub border: u32,
    /// Descriptor length in bits; a multiple of 128.
    pub descriptor_bits: usize,
    /// Matches drawn by `draw_matches` callers.
    pub draw_limit: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            fast_threshold: 20,
            max_keypoints: 500,
            border: 16,
            descriptor_bits: 256,
            draw_limit: 50,
        }
    }
}

/// A keypoint in the first image paired with its nearest descriptor in the
/// second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureMatch {
    pub first: Point<u32>,
    pub second: Point<u32>,
    /// Hamming distance between the descriptors.
    pub distance: u32,
}

#[derive(Debug, Clone)]
pub struct MatchResult {
    pub keypoints_first: usize,
    pub keypoints_second: usize,
    /// Every match, best (smallest distance) first.
    pub matches: Vec<FeatureMatch>,
}

impl MatchResult {
    /// The best `limit` matches.
    pub fn best(&self, limit: usize) -> &[FeatureMatch] {
        &self.matches[..limit.min(self.matches.len())]
    }
}

/// Strongest FAST corners away from the border.
pub fn detect_keypoints(image: &GrayImage, options: &MatchOptions) -> Vec<Point<u32>> {
    let (width, height) = image.dimensions();
    if width <= 2 * options.border || height <= 2 * options.border {
        return Vec::new();
    }

    let mut corners: Vec<_> = corners_fast9(image, options.fast_threshold)
        .into_iter()
        .filter(|c| {
            c.x >= options.border
                && c.y >= options.border
                && c.x < width - options.border
                && c.y < height - options.border
        })
        .collect();
    corners.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.y.cmp(&b.y)).then(a.x.cmp(&b.x)));
    corners.truncate(options.max_keypoints);
    corners.into_iter().map(|c| Point::new(c.x, c.y)).collect()
}

/// Describe keypoints with BRIEF. Pass the test pairs from a previous call to
/// make descriptors comparable across images.
fn describe(
    image: &GrayImage,
    keypoints: &[Point<u32>],
    options: &MatchOptions,
    test_pairs: Option<&Vec<TestPair>>,
) -> Result<(Vec<BriefDescriptor>, Vec<TestPair>), BildwerkError> {
    brief(image, keypoints, options.descriptor_bits, test_pairs)
        .map_err(|reason| BildwerkError::InvalidParameter(format!("BRIEF: {reason}")))
}

/// Detect, describe and brute-force match keypoints between two images.
///
/// Every descriptor of the first image is paired with its nearest neighbour
/// in the second. Returns `BildwerkError::NoFeatures` when either image yields
/// no descriptors.
#[instrument(skip_all)]
pub fn match_features(
    first: &GrayImage,
    second: &GrayImage,
    options: &MatchOptions,
) -> Result<MatchResult, BildwerkError> {
    let keypoints_first = detect_keypoints(first, options);
    let keypoints_second = detect_keypoints(second, options);
    debug!(
        first = keypoints_first.len(),
        second = keypoints_second.len(),
        "Keypoints detected"
    );
    if keypoints_first.is_empty() || keypoints_second.is_empty() {
        return Err(BildwerkError::NoFeatures);
    }

    let (descriptors_first, test_pairs) = describe(first, &keypoints_first, options, None)?;
    let (descriptors_second, _) = describe(second, &keypoints_second, options, Some(&test_pairs))?;
    if descriptors_first.is_empty() || descriptors_second.is_empty() {
        return Err(BildwerkError::NoFeatures);
    }

    let mut matches: Vec<FeatureMatch> = descriptors_first
        .iter()
        .filter_map(|d1| {
            descriptors_second
                .iter()
                .map(|d2| (d2, d1.hamming_distance(d2)))
                .min_by_key(|(_, distance)| *distance)
                .map(|(d2, distance)| FeatureMatch {
                    first: d1.position(),
                    second: d2.position(),
                    distance,
                })
        })
        .collect();
    matches.sort_by_key(|m| m.distance);

    info!(matches = matches.len(), "Feature matching complete");
    Ok(MatchResult {
        keypoints_first: descriptors_first.len(),
        keypoints_second: descriptors_second.len(),
        matches,
    })
}

const MATCH_PALETTE: [Rgb<u8>; 6] = [
    Rgb([0, 255, 0]),
    Rgb([255, 0, 0]),
    Rgb([0, 128, 255]),
    Rgb([255, 200, 0]),
    Rgb([255, 0, 255]),
    Rgb([0, 255, 255]),
];

/// Place both images side by side and connect each match with a line, marking
/// both keypoints.
pub fn draw_matches(first: &RgbImage, second: &RgbImage, matches: &[FeatureMatch]) -> RgbImage {
    let width = first.width() + second.width();
    let height = first.height().max(second.height());
    let mut canvas = RgbImage::new(width, height);
    image::imageops::replace(&mut canvas, first, 0, 0);
    image::imageops::replace(&mut canvas, second, first.width() as i64, 0);

    let offset = first.width() as f32;
    for (index, m) in matches.iter().enumerate() {
        let color = MATCH_PALETTE[index % MATCH_PALETTE.len()];
        let start = (m.first.x as f32, m.first.y as f32);
        let end = (m.second.x as f32 + offset, m.second.y as f32);
        draw_line_segment_mut(&mut canvas, start, end, color);
        draw_hollow_circle_mut(&mut canvas, (start.0 as i32, start.1 as i32), 4, color);
        draw_hollow_circle_mut(&mut canvas, (end.0 as i32, end.1 as i32), 4, color);
    }
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect;

    /// Dark background with bright squares, giving plenty of FAST corners.
    fn blocks() -> GrayImage {
        let mut img = GrayImage::from_pixel(160, 120, Luma([20u8]));
        for (i, &(x, y, size)) in [(30, 30, 20u32), (90, 40, 25), (50, 75, 18), (110, 80, 15)]
            .iter()
            .enumerate()
        {
            let shade = 150 + 25 * i as u8;
            draw_filled_rect_mut(
                &mut img,
                Rect::at(x, y).of_size(size, size),
                Luma([shade]),
            );
        }
        img
    }

    #[test]
    fn flat_image_has_no_features() {
        let flat = GrayImage::from_pixel(100, 100, Luma([90u8]));
        let err = match_features(&flat, &blocks(), &MatchOptions::default())
            .err()
            .expect("should fail");
        assert!(matches!(err, BildwerkError::NoFeatures));
    }

    #[test]
    fn keypoints_respect_border() {
        let opts = MatchOptions::default();
        let keypoints = detect_keypoints(&blocks(), &opts);
        assert!(!keypoints.is_empty());
        for p in keypoints {
            assert!(p.x >= opts.border && p.y >= opts.border);
            assert!(p.x < 160 - opts.border && p.y < 120 - opts.border);
        }
    }

    #[test]
    fn tiny_image_has_no_keypoints() {
        let tiny = GrayImage::from_pixel(20, 20, Luma([0u8]));
        assert!(detect_keypoints(&tiny, &MatchOptions::default()).is_empty());
    }

    #[test]
    fn identical_images_match_perfectly() {
        let img = blocks();
        let result = match_features(&img, &img, &MatchOptions::default()).expect("match");
        assert!(!result.matches.is_empty());
        assert_eq!(result.matches.len(), result.keypoints_first);
        assert_eq!(result.matches[0].distance, 0);
        assert!(result.matches.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn best_is_capped_by_available_matches() {
        let img = blocks();
        let result = match_features(&img, &img, &MatchOptions::default()).expect("match");
        assert_eq!(result.best(10_000).len(), result.matches.len());
        assert_eq!(result.best(1).len(), 1);
    }

    #[test]
    fn drawing_places_images_side_by_side() {
        let a = RgbImage::from_pixel(30, 20, Rgb([10, 10, 10]));
        let b = RgbImage::from_pixel(40, 25, Rgb([200, 200, 200]));
        let m = FeatureMatch {
            first: Point::new(5, 5),
            second: Point::new(10, 10),
            distance: 3,
        };
        let out = draw_matches(&a, &b, &[m]);
        assert_eq!(out.dimensions(), (70, 25));
        assert_eq!(*out.get_pixel(69, 0), Rgb([200, 200, 200]));
        assert_eq!(*out.get_pixel(5, 5), MATCH_PALETTE[0]);
    }
}
