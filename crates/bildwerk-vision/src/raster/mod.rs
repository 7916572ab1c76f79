// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster module — loading, saving, flips, rotation and per-pixel adjustments.

pub mod color;
pub mod processor;

pub use processor::ImageProcessor;
