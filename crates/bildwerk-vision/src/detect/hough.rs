// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Gradient Hough circle transform — edge pixels vote along their gradient
// direction for candidate centers, then each surviving center gets a radius
// from the distribution of edge distances around it.

use bildwerk_core::error::BildwerkError;
use bildwerk_core::{Circle, HoughCircleParams};
use image::GrayImage;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::gradients::{horizontal_sobel, vertical_sobel};
use tracing::{debug, instrument};

/// Detect circles in a (pre-smoothed) grayscale image.
///
/// ## Pipeline
///
/// 1. Canny edge detection with thresholds `edge_threshold / 2` and
///    `edge_threshold`
/// 2. Sobel gradients of a lightly smoothed copy at each edge pixel
/// 3. Every edge pixel votes along its gradient (both senses) for each
///    distance in `[min_radius, max_radius]`, into an accumulator downscaled
///    by `dp`
/// 4. Accumulator local maxima above `accumulator_threshold` become center
///    candidates, strongest first
/// 5. Candidates within `min_dist` of an accepted circle are dropped
/// 6. The radius is the best-supported distance band around the center; it
///    needs at least `accumulator_threshold` edge pixels
///
/// Returns circles ordered by accumulator votes, strongest first. An image
/// without edges yields an empty vector.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn detect_circles(
    image: &GrayImage,
    params: &HoughCircleParams,
) -> Result<Vec<Circle>, BildwerkError> {
    params.validate()?;

    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Ok(Vec::new());
    }

    let edges = canny(image, params.edge_threshold / 2.0, params.edge_threshold);
    let points = edge_points(image, &edges);
    debug!(edge_points = points.len(), "Edge points collected");
    if points.is_empty() {
        return Ok(Vec::new());
    }

    let mut accumulator = Accumulator::new(width, height, params.dp);
    for point in &points {
        accumulator.vote(point, params.min_radius, params.max_radius);
    }

    let candidates = accumulator.peaks(params.accumulator_threshold);
    debug!(candidates = candidates.len(), "Center candidates found");

    let min_dist_sq = params.min_dist * params.min_dist;
    let mut circles: Vec<Circle> = Vec::new();

    for candidate in candidates {
        let (cx, cy) = accumulator.cell_center(candidate.col, candidate.row);
        let too_close = circles.iter().any(|accepted| {
            let dx = accepted.x - cx;
            let dy = accepted.y - cy;
            dx * dx + dy * dy < min_dist_sq
        });
        if too_close {
            continue;
        }

        if let Some(radius) = estimate_radius(&points, cx, cy, params) {
            circles.push(Circle {
                x: cx,
                y: cy,
                radius,
                votes: candidate.votes,
            });
        }
    }

    debug!(circles = circles.len(), "Circle detection complete");
    Ok(circles)
}

// -- Edge points --------------------------------------------------------------

/// An edge pixel together with its unit gradient direction.
#[derive(Debug, Clone, Copy)]
struct EdgePoint {
    x: f32,
    y: f32,
    dx: f32,
    dy: f32,
}

/// Sigma of the smoothing applied before gradient estimation; matches the
/// blur canny applies internally.
const GRADIENT_SIGMA: f32 = 1.4;

fn edge_points(image: &GrayImage, edges: &GrayImage) -> Vec<EdgePoint> {
    // Staircase boundaries give poor 3x3 gradient directions without smoothing.
    let smoothed = gaussian_blur_f32(image, GRADIENT_SIGMA);
    let gx = horizontal_sobel(&smoothed);
    let gy = vertical_sobel(&smoothed);

    let mut points = Vec::new();
    for (x, y, pixel) in edges.enumerate_pixels() {
        if pixel.0[0] == 0 {
            continue;
        }
        let dx = gx.get_pixel(x, y).0[0] as f32;
        let dy = gy.get_pixel(x, y).0[0] as f32;
        let magnitude = (dx * dx + dy * dy).sqrt();
        if magnitude == 0.0 {
            continue;
        }
        points.push(EdgePoint {
            x: x as f32,
            y: y as f32,
            dx: dx / magnitude,
            dy: dy / magnitude,
        });
    }
    points
}

// -- Accumulator --------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Peak {
    col: u32,
    row: u32,
    votes: u32,
}

/// Center-vote accumulator at `1/dp` of the image resolution.
struct Accumulator {
    cols: u32,
    rows: u32,
    dp: u32,
    cells: Vec<u32>,
}

impl Accumulator {
    fn new(width: u32, height: u32, dp: u32) -> Self {
        let cols = width.div_ceil(dp);
        let rows = height.div_ceil(dp);
        Self {
            cols,
            rows,
            dp,
            cells: vec![0; (cols * rows) as usize],
        }
    }

    fn get(&self, col: i64, row: i64) -> u32 {
        if col < 0 || row < 0 || col >= self.cols as i64 || row >= self.rows as i64 {
            return 0;
        }
        self.cells[(row as u32 * self.cols + col as u32) as usize]
    }

    fn vote(&mut self, point: &EdgePoint, min_radius: u32, max_radius: u32) {
        let scale = self.dp as f32;
        for sign in [1.0f32, -1.0] {
            let mut last: Option<(i64, i64)> = None;
            for r in min_radius..=max_radius {
                let distance = sign * r as f32;
                let col = ((point.x + point.dx * distance) / scale).round() as i64;
                let row = ((point.y + point.dy * distance) / scale).round() as i64;
                if col < 0 || row < 0 || col >= self.cols as i64 || row >= self.rows as i64 {
                    // Rays only move further out of bounds from here.
                    break;
                }
                // One vote per cell per ray.
                if last == Some((col, row)) {
                    continue;
                }
                last = Some((col, row));
                self.cells[(row as u32 * self.cols + col as u32) as usize] += 1;
            }
        }
    }

    /// Local maxima above `threshold`, strongest first. Ties with the right and
    /// lower neighbours resolve to the upper-left cell.
    fn peaks(&self, threshold: u32) -> Vec<Peak> {
        let mut peaks = Vec::new();
        for row in 0..self.rows as i64 {
            for col in 0..self.cols as i64 {
                let votes = self.get(col, row);
                if votes <= threshold {
                    continue;
                }
                if votes > self.get(col - 1, row)
                    && votes >= self.get(col + 1, row)
                    && votes > self.get(col, row - 1)
                    && votes >= self.get(col, row + 1)
                {
                    peaks.push(Peak {
                        col: col as u32,
                        row: row as u32,
                        votes,
                    });
                }
            }
        }
        peaks.sort_by(|a, b| {
            b.votes
                .cmp(&a.votes)
                .then(a.row.cmp(&b.row))
                .then(a.col.cmp(&b.col))
        });
        peaks
    }

    /// Image coordinates of an accumulator cell.
    fn cell_center(&self, col: u32, row: u32) -> (f32, f32) {
        ((col * self.dp) as f32, (row * self.dp) as f32)
    }
}

// -- Radius estimation --------------------------------------------------------

/// Pick the radius band with the most edge pixels around `(cx, cy)`.
///
/// Distances are binned to whole pixels; each bin is scored together with its
/// two neighbours. The winning band needs `accumulator_threshold` supporting
/// edge pixels, and the radius is their mean distance.
fn estimate_radius(
    points: &[EdgePoint],
    cx: f32,
    cy: f32,
    params: &HoughCircleParams,
) -> Option<f32> {
    let min_r = params.min_radius as f32;
    let max_r = params.max_radius as f32;
    let bins = (params.max_radius - params.min_radius + 1) as usize;

    let mut counts = vec![0u32; bins];
    let mut sums = vec![0f32; bins];
    for point in points {
        let dx = point.x - cx;
        let dy = point.y - cy;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance < min_r - 0.5 || distance >= max_r + 0.5 {
            continue;
        }
        let bin = ((distance.round() - min_r).max(0.0) as usize).min(bins - 1);
        counts[bin] += 1;
        sums[bin] += distance;
    }

    let mut best: Option<(usize, u32)> = None;
    for center in 0..bins {
        let lo = center.saturating_sub(1);
        let hi = (center + 1).min(bins - 1);
        let support: u32 = counts[lo..=hi].iter().sum();
        if best.is_none_or(|(_, current)| support > current) {
            best = Some((center, support));
        }
    }

    let (center, support) = best?;
    if support < params.accumulator_threshold {
        return None;
    }
    let lo = center.saturating_sub(1);
    let hi = (center + 1).min(bins - 1);
    let total: f32 = sums[lo..=hi].iter().sum();
    Some(total / support as f32)
}
