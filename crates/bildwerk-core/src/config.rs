// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::types::{HoughCircleParams, SketchOptions};

/// File name looked up in the working directory for overrides.
pub const CONFIG_FILE: &str = "bildwerk.json";

/// Settings for every Bildwerk command. `Default` carries the fixed values the
/// commands use when no config file is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BildwerkConfig {
    /// Directory scanned by the circle and augmentation batches.
    pub input_dir: PathBuf,
    /// Directory receiving annotated and augmented images.
    pub output_dir: PathBuf,
    /// Directory receiving pencil sketches.
    pub sketch_output_dir: PathBuf,
    /// Path of the side-by-side feature match image.
    pub match_output: PathBuf,
    /// Circle detector constants.
    pub detector: DetectorConfig,
    /// Defaults for the sketch command.
    pub sketch: SketchOptions,
}

impl Default for BildwerkConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("test_images"),
            output_dir: PathBuf::from("output_images"),
            sketch_output_dir: PathBuf::from("output_sketches"),
            match_output: PathBuf::from("output_images/matches.png"),
            detector: DetectorConfig::default(),
            sketch: SketchOptions::default(),
        }
    }
}

impl BildwerkConfig {
    /// Read a config file. Returns `Ok(None)` when the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&data)?;
        debug!(path = %path.display(), "Config loaded");
        Ok(Some(config))
    }

    /// Read a config file, falling back to defaults when it is missing or
    /// malformed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(Some(config)) => config,
            Ok(None) => Self::default(),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Ignoring unreadable config file");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Circle detector constants; the minimum center distance is derived from the
/// image height at detection time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub dp: u32,
    /// `min_dist = image_height / min_dist_divisor`.
    pub min_dist_divisor: f32,
    pub edge_threshold: f32,
    pub accumulator_threshold: u32,
    pub min_radius: u32,
    pub max_radius: u32,
    /// Median filter kernel size applied before detection.
    pub median_kernel: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            dp: 1,
            min_dist_divisor: 8.0,
            edge_threshold: 100.0,
            accumulator_threshold: 30,
            min_radius: 20,
            max_radius: 100,
            median_kernel: 5,
        }
    }
}

impl DetectorConfig {
    /// Detector parameters for an image of the given height.
    pub fn params_for_height(&self, height: u32) -> HoughCircleParams {
        HoughCircleParams {
            dp: self.dp,
            min_dist: height as f32 / self.min_dist_divisor,
            edge_threshold: self.edge_threshold,
            accumulator_threshold: self.accumulator_threshold,
            min_radius: self.min_radius,
            max_radius: self.max_radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_follow_image_height() {
        let params = DetectorConfig::default().params_for_height(400);
        assert_eq!(params.min_dist, 50.0);
        assert_eq!(params.dp, 1);
        assert_eq!(params.edge_threshold, 100.0);
        assert_eq!(params.accumulator_threshold, 30);
        assert_eq!((params.min_radius, params.max_radius), (20, 100));
        assert!(params.validate().is_ok());
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let loaded = BildwerkConfig::load(&dir.path().join(CONFIG_FILE)).expect("load");
        assert!(loaded.is_none());
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{ "input_dir": "photos" }"#).expect("write");

        let config = BildwerkConfig::load_or_default(&path);
        assert_eq!(config.input_dir, PathBuf::from("photos"));
        assert_eq!(config.output_dir, PathBuf::from("output_images"));
        assert_eq!(config.detector, DetectorConfig::default());
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "not json").expect("write");
        assert_eq!(BildwerkConfig::load_or_default(&path), BildwerkConfig::default());
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        let mut config = BildwerkConfig::default();
        config.sketch.color = false;
        config.detector.max_radius = 80;
        config.save(&path).expect("save");

        let loaded = BildwerkConfig::load(&path).expect("load").expect("present");
        assert_eq!(loaded, config);
    }
}
