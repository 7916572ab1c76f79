// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Augmentation batch — every decodable image in the input directory gets a
// contact sheet of its augmentations written as `augmented_<name>`.

use std::path::{Path, PathBuf};

use bildwerk_core::config::BildwerkConfig;
use bildwerk_core::error::Result;
use bildwerk_vision::{ImageProcessor, apply_augmentations, contact_sheet};
use image::RgbImage;
use tracing::{debug, info, instrument, warn};

use crate::inputs::{enumerate_any_case, prefixed_output_name};
use crate::report::AugmentReporter;

pub const OUTPUT_PREFIX: &str = "augmented_";

#[derive(Debug)]
pub enum AugmentOutcome {
    Written { input: PathBuf, output: PathBuf },
    WriteFailed { input: PathBuf, output: PathBuf, reason: String },
}

#[derive(Debug, Clone)]
pub struct AugmentBatch {
    input_dir: PathBuf,
    output_dir: PathBuf,
}

impl AugmentBatch {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn from_config(config: &BildwerkConfig) -> Self {
        Self::new(&config.input_dir, &config.output_dir)
    }

    /// Decode and process one input at a time; undecodable files are dropped
    /// silently. The output directory is created before the first write. If
    /// nothing decodes, report it once and leave the output directory alone.
    #[instrument(skip_all, fields(input = %self.input_dir.display()))]
    pub fn run(&self, reporter: &mut dyn AugmentReporter) -> Result<Vec<AugmentOutcome>> {
        let mut outcomes = Vec::new();
        for input in enumerate_any_case(&self.input_dir) {
            let Some(image) = decode(&input) else {
                continue;
            };
            if outcomes.is_empty() {
                std::fs::create_dir_all(&self.output_dir)?;
            }
            outcomes.push(self.process_one(input, image, reporter));
        }

        if outcomes.is_empty() {
            reporter.no_images();
        } else {
            info!(count = outcomes.len(), "Augmentation batch complete");
        }
        Ok(outcomes)
    }

    fn process_one(
        &self,
        input: PathBuf,
        image: RgbImage,
        reporter: &mut dyn AugmentReporter,
    ) -> AugmentOutcome {
        let filename = input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        reporter.starting(&filename);

        let sheet = contact_sheet(&image, &apply_augmentations(&image));
        let output_name = prefixed_output_name(OUTPUT_PREFIX, &input)
            .unwrap_or_else(|| format!("{OUTPUT_PREFIX}{filename}").into());
        let output = self.output_dir.join(output_name);

        let outcome = match ImageProcessor::from_rgb(sheet).save(&output) {
            Ok(()) => {
                debug!(path = %output.display(), "Contact sheet written");
                AugmentOutcome::Written { input, output }
            }
            Err(err) => {
                warn!(path = %output.display(), error = %err, "Failed to write contact sheet");
                reporter.write_failed(&output, &err);
                AugmentOutcome::WriteFailed {
                    input,
                    output,
                    reason: err.to_string(),
                }
            }
        };
        reporter.finished(&filename);
        outcome
    }
}

fn decode(path: &Path) -> Option<RgbImage> {
    match ImageProcessor::open(path) {
        Ok(processor) => Some(processor.into_rgb8()),
        Err(err) => {
            debug!(path = %path.display(), error = %err, "Skipping undecodable file");
            None
        }
    }
}
