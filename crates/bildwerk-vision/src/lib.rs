// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// bildwerk-vision — Image routines for Bildwerk.
//
// Provides image loading and per-pixel adjustments, a gradient Hough circle
// detector with annotation, the pencil sketch effect, a fixed augmentation set,
// and FAST/BRIEF keypoint matching.

pub mod annotate;
pub mod augment;
pub mod detect;
pub mod features;
pub mod raster;
pub mod sketch;

// Re-export the primary entry points so callers can use `bildwerk_vision::detect_circles` etc.
pub use annotate::annotate_circles;
pub use augment::{Augmentation, apply_augmentations, contact_sheet};
pub use detect::hough::detect_circles;
pub use features::{FeatureMatch, MatchOptions, MatchResult, draw_matches, match_features};
pub use raster::processor::ImageProcessor;
pub use sketch::pencil_sketch;
