// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Bildwerk.

use serde::{Deserialize, Serialize};

use crate::error::{BildwerkError, Result};

/// A circle located by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    /// Center column in image pixels.
    pub x: f32,
    /// Center row in image pixels.
    pub y: f32,
    /// Radius in pixels.
    pub radius: f32,
    /// Accumulator support for the center (higher is more confident).
    pub votes: u32,
}

impl Circle {
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Self {
            x,
            y,
            radius,
            votes: 0,
        }
    }

    /// Center rounded to whole pixels, as used for drawing.
    pub fn pixel_center(&self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }

    /// Radius rounded to whole pixels, as used for drawing and labels.
    pub fn pixel_radius(&self) -> i32 {
        self.radius.round() as i32
    }
}

/// Per-image detection statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionSummary {
    pub count: usize,
    /// Arithmetic mean radius; `None` when nothing was detected.
    pub mean_radius: Option<f64>,
}

impl DetectionSummary {
    /// Summarise a (possibly empty) detection result.
    pub fn from_circles(circles: &[Circle]) -> Self {
        if circles.is_empty() {
            return Self {
                count: 0,
                mean_radius: None,
            };
        }
        let total: f64 = circles.iter().map(|c| c.radius as f64).sum();
        Self {
            count: circles.len(),
            mean_radius: Some(total / circles.len() as f64),
        }
    }
}

/// Parameters for the gradient Hough circle transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoughCircleParams {
    /// Inverse accumulator resolution (1 = same resolution as the image).
    pub dp: u32,
    /// Minimum distance between accepted circle centers.
    pub min_dist: f32,
    /// Upper Canny threshold; the lower one is half of it.
    pub edge_threshold: f32,
    /// Minimum accumulator votes for a center, and minimum edge support for a radius.
    pub accumulator_threshold: u32,
    pub min_radius: u32,
    pub max_radius: u32,
}

impl HoughCircleParams {
    pub fn validate(&self) -> Result<()> {
        if self.dp == 0 {
            return Err(BildwerkError::InvalidParameter(
                "accumulator resolution must be at least 1".into(),
            ));
        }
        if !(self.min_dist > 0.0) {
            return Err(BildwerkError::InvalidParameter(format!(
                "minimum center distance must be positive, got {}",
                self.min_dist
            )));
        }
        if !(self.edge_threshold > 0.0) {
            return Err(BildwerkError::InvalidParameter(format!(
                "edge threshold must be positive, got {}",
                self.edge_threshold
            )));
        }
        if self.accumulator_threshold == 0 {
            return Err(BildwerkError::InvalidParameter(
                "accumulator threshold must be at least 1".into(),
            ));
        }
        if self.min_radius > self.max_radius {
            return Err(BildwerkError::InvalidParameter(format!(
                "radius bounds are inverted: [{}, {}]",
                self.min_radius, self.max_radius
            )));
        }
        Ok(())
    }
}

impl Default for HoughCircleParams {
    fn default() -> Self {
        Self {
            dp: 1,
            min_dist: 1.0,
            edge_threshold: 100.0,
            accumulator_threshold: 30,
            min_radius: 20,
            max_radius: 100,
        }
    }
}

/// User choices for the pencil sketch effect, collected by the front end
/// before the transformation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchOptions {
    /// Keep hue and saturation (colour sketch) instead of a grayscale one.
    pub color: bool,
    /// Gaussian kernel size; must be odd.
    pub blur_kernel: u32,
    /// Write the result to the sketch output directory.
    pub save: bool,
}

impl SketchOptions {
    pub fn validate(&self) -> Result<()> {
        if self.blur_kernel % 2 == 0 {
            return Err(BildwerkError::InvalidParameter(format!(
                "blur kernel must be an odd integer, got {}",
                self.blur_kernel
            )));
        }
        Ok(())
    }
}

impl Default for SketchOptions {
    fn default() -> Self {
        Self {
            color: true,
            blur_kernel: 21,
            save: true,
        }
    }
}

/// Supported image extensions, lower-case. The circle batch matches them
/// case-sensitively.
pub const BATCH_IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Whether a file name carries a supported image extension, ignoring case.
pub fn has_image_extension(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    BATCH_IMAGE_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{ext}")))
}
