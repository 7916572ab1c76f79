// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `bildwerk match` — keypoint matching between two images.

use std::path::Path;

use bildwerk_core::BildwerkConfig;
use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_vision::{ImageProcessor, MatchOptions, draw_matches, match_features};
use tracing::{info, warn};

pub fn run(config: &BildwerkConfig, first: &Path, second: &Path) -> Result<()> {
    let (first, second) = match (ImageProcessor::open(first), ImageProcessor::open(second)) {
        (Ok(a), Ok(b)) => (a.into_rgb8(), b.into_rgb8()),
        (Err(err), _) | (_, Err(err)) => {
            warn!(error = %err, "Could not load images for matching");
            println!("Error loading images!");
            return Ok(());
        }
    };

    let options = MatchOptions::default();
    let gray_first = image::DynamicImage::ImageRgb8(first.clone()).into_luma8();
    let gray_second = image::DynamicImage::ImageRgb8(second.clone()).into_luma8();
    let result = match match_features(&gray_first, &gray_second, &options) {
        Ok(result) => result,
        Err(BildwerkError::NoFeatures) => {
            println!("No descriptors found!");
            return Ok(());
        }
        Err(err) => return Err(err),
    };

    println!("Found {} total matches.", result.matches.len());

    let canvas = draw_matches(&first, &second, result.best(options.draw_limit));
    if let Some(parent) = config.match_output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    ImageProcessor::from_rgb(canvas).save(&config.match_output)?;
    info!(
        path = %config.match_output.display(),
        drawn = result.best(options.draw_limit).len(),
        "Match image written"
    );
    Ok(())
}
