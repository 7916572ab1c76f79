// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Circle detection batch — decode every input in the input directory, detect
// circles, annotate a copy and write it as `detected_<name>`.

use std::path::{Path, PathBuf};

use bildwerk_core::config::{BildwerkConfig, DetectorConfig};
use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::DetectionSummary;
use bildwerk_vision::detect::prepare_for_detection;
use bildwerk_vision::{ImageProcessor, annotate_circles, detect_circles};
use tracing::{debug, info, instrument, warn};

use crate::inputs::{enumerate_batch_inputs, prefixed_output_name};
use crate::report::BatchReporter;

/// Prefix prepended to every annotated output file name.
pub const OUTPUT_PREFIX: &str = "detected_";

/// What happened to one discovered input.
#[derive(Debug)]
pub enum ImageOutcome {
    /// Detection ran and the annotated copy was written to `output`.
    Annotated {
        input: PathBuf,
        output: PathBuf,
        summary: DetectionSummary,
    },
    /// The file could not be decoded and was skipped.
    Unreadable { input: PathBuf, reason: String },
    /// Detection ran but the annotated copy could not be written.
    WriteFailed {
        input: PathBuf,
        output: PathBuf,
        reason: String,
    },
}

/// Result of one batch run, one outcome per discovered input in processing
/// order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub discovered: usize,
    pub outcomes: Vec<ImageOutcome>,
}

impl BatchReport {
    /// Paths of the annotated files that were written.
    pub fn written(&self) -> Vec<&Path> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                ImageOutcome::Annotated { output, .. } => Some(output.as_path()),
                _ => None,
            })
            .collect()
    }

    /// Number of inputs skipped because they could not be decoded.
    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome, ImageOutcome::Unreadable { .. }))
            .count()
    }
}

/// Batch circle detection over one input directory.
#[derive(Debug, Clone)]
pub struct CircleBatch {
    input_dir: PathBuf,
    output_dir: PathBuf,
    detector: DetectorConfig,
}

impl CircleBatch {
    /// A batch with the default detector constants.
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            detector: DetectorConfig::default(),
        }
    }

    pub fn from_config(config: &BildwerkConfig) -> Self {
        Self::new(&config.input_dir, &config.output_dir).with_detector(config.detector)
    }

    pub fn with_detector(mut self, detector: DetectorConfig) -> Self {
        self.detector = detector;
        self
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Process every input in order.
    ///
    /// Decode failures and write failures are reported and skipped. Failing to
    /// create the output directory and invalid detector parameters end the run
    /// with an error. When nothing is found the output directory is left
    /// untouched.
    #[instrument(skip_all, fields(input = %self.input_dir.display(), output = %self.output_dir.display()))]
    pub fn run(&self, reporter: &mut dyn BatchReporter) -> Result<BatchReport> {
        let inputs = enumerate_batch_inputs(&self.input_dir);
        if inputs.is_empty() {
            info!("No batch inputs found");
            reporter.no_inputs(&self.input_dir);
            return Ok(BatchReport::default());
        }

        reporter.found(inputs.len());
        std::fs::create_dir_all(&self.output_dir)?;

        let mut report = BatchReport {
            discovered: inputs.len(),
            outcomes: Vec::with_capacity(inputs.len()),
        };
        for input in inputs {
            let outcome = self.process_one(&input, reporter)?;
            report.outcomes.push(outcome);
        }

        info!(
            discovered = report.discovered,
            written = report.written().len(),
            skipped = report.skipped(),
            "Circle batch complete"
        );
        Ok(report)
    }

    fn process_one(&self, input: &Path, reporter: &mut dyn BatchReporter) -> Result<ImageOutcome> {
        let filename = input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        reporter.processing(&filename);

        let image = match ImageProcessor::open(input) {
            Ok(processor) => processor.into_rgb8(),
            Err(err) => {
                warn!(path = %input.display(), error = %err, "Skipping unreadable image");
                reporter.unreadable(input, &err);
                return Ok(ImageOutcome::Unreadable {
                    input: input.to_path_buf(),
                    reason: err.to_string(),
                });
            }
        };

        let prepared = prepare_for_detection(&image, self.detector.median_kernel);
        let params = self.detector.params_for_height(image.height());
        let circles = detect_circles(&prepared, &params)?;
        let summary = DetectionSummary::from_circles(&circles);
        debug!(count = summary.count, "Circles detected");
        reporter.detected(&filename, &summary);

        let annotated = annotate_circles(&image, &circles);
        let output_name = prefixed_output_name(OUTPUT_PREFIX, input).ok_or_else(|| {
            BildwerkError::InvalidParameter(format!(
                "input path has no usable file name: {}",
                input.display()
            ))
        })?;
        let output = self.output_dir.join(output_name);

        let outcome = match ImageProcessor::from_rgb(annotated).save(&output) {
            Ok(()) => ImageOutcome::Annotated {
                input: input.to_path_buf(),
                output,
                summary,
            },
            Err(err) => {
                warn!(path = %output.display(), error = %err, "Failed to write annotated image");
                reporter.write_failed(&output, &err);
                ImageOutcome::WriteFailed {
                    input: input.to_path_buf(),
                    output,
                    reason: err.to_string(),
                }
            }
        };
        reporter.finished(&filename);
        Ok(outcome)
    }
}
