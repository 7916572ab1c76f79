// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// bildwerk-batch — Directory batch runners.
//
// Scans an input directory, runs one image at a time through a fixed
// transformation, reports progress through a `BatchReporter`, and writes one
// output file per readable input.

pub mod augment;
pub mod circles;
pub mod inputs;
pub mod report;

pub use augment::{AugmentBatch, AugmentOutcome};
pub use circles::{BatchReport, CircleBatch, ImageOutcome};
pub use report::{AugmentReporter, BatchReporter, ConsoleReporter};
