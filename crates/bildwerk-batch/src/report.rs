// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Progress reporting for the batch runners. The runners call a
// `BatchReporter` at each step; `ConsoleReporter` prints the human-readable
// lines to stdout.

use std::path::Path;

use bildwerk_core::DetectionSummary;
use bildwerk_core::error::BildwerkError;

/// Receives batch progress events in order.
pub trait BatchReporter {
    /// The input scan found nothing. No other event follows.
    fn no_inputs(&mut self, input_dir: &Path);

    /// The input scan found `count` files.
    fn found(&mut self, count: usize);

    /// Work on `filename` is starting.
    fn processing(&mut self, filename: &str);

    /// `path` could not be decoded and was skipped.
    fn unreadable(&mut self, path: &Path, error: &BildwerkError);

    /// Detection statistics for one image.
    fn detected(&mut self, filename: &str, summary: &DetectionSummary);

    /// Work on `filename` finished (output written or write failed).
    fn finished(&mut self, _filename: &str) {}

    /// The output for `path` could not be written.
    fn write_failed(&mut self, path: &Path, error: &BildwerkError);
}

/// Receives augmentation batch events in order.
pub trait AugmentReporter {
    /// Nothing decodable was found. No other event follows.
    fn no_images(&mut self);

    fn starting(&mut self, filename: &str);

    fn finished(&mut self, filename: &str);

    /// The contact sheet for an input could not be written.
    fn write_failed(&mut self, path: &Path, error: &BildwerkError);
}

// -- Message text -------------------------------------------------------------

pub fn no_images_message(input_dir: &Path) -> String {
    format!("No images found in the given directory \"{}\"", input_dir.display())
}

pub fn found_message(count: usize) -> String {
    format!("Found {count} images in the given image directory.")
}

pub fn processing_message(filename: &str) -> String {
    format!("Processing: {filename}")
}

pub fn unreadable_message(path: &Path) -> String {
    format!("Error: Could not read the image {}", path.display())
}

pub fn write_failed_message(path: &Path, error: &BildwerkError) -> String {
    format!("Error: Could not write {}: {error}", path.display())
}

pub fn augment_starting_message(filename: &str) -> String {
    format!("Starting augmentations for {filename}.")
}

pub fn augment_finished_message(filename: &str) -> String {
    format!("Finished augmentations for {filename}.")
}

/// The count line, followed by the mean radius line when anything was found.
pub fn summary_lines(summary: &DetectionSummary) -> Vec<String> {
    let mut lines = vec![format!("  Circles detected: {}", summary.count)];
    if let Some(mean) = summary.mean_radius {
        lines.push(format!("  Average radius: {mean:.2} pixels"));
    }
    lines
}

/// Prints progress lines to stdout.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl BatchReporter for ConsoleReporter {
    fn no_inputs(&mut self, input_dir: &Path) {
        println!("{}", no_images_message(input_dir));
    }

    fn found(&mut self, count: usize) {
        println!("{}", found_message(count));
    }

    fn processing(&mut self, filename: &str) {
        println!("{}", processing_message(filename));
    }

    fn unreadable(&mut self, path: &Path, _error: &BildwerkError) {
        println!("{}", unreadable_message(path));
    }

    fn detected(&mut self, _filename: &str, summary: &DetectionSummary) {
        for line in summary_lines(summary) {
            println!("{line}");
        }
    }

    fn write_failed(&mut self, path: &Path, error: &BildwerkError) {
        println!("{}", write_failed_message(path, error));
    }
}

impl AugmentReporter for ConsoleReporter {
    fn no_images(&mut self) {
        println!("No images found.");
    }

    fn starting(&mut self, filename: &str) {
        println!("{}", augment_starting_message(filename));
    }

    fn finished(&mut self, filename: &str) {
        println!("{}", augment_finished_message(filename));
    }

    fn write_failed(&mut self, path: &Path, error: &BildwerkError) {
        println!("{}", write_failed_message(path, error));
    }
}
