// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `bildwerk sketch` — pencil sketch of a single image.

use std::path::{Path, PathBuf};

use bildwerk_core::error::Result;
use bildwerk_core::recent::RecentDirectory;
use bildwerk_core::{BildwerkConfig, SketchOptions};
use bildwerk_vision::{ImageProcessor, pencil_sketch};
use tracing::{info, warn};

/// Apply command-line choices on top of the configured defaults. `None`
/// keeps the configured value.
pub fn options_from_flags(
    defaults: SketchOptions,
    color: Option<bool>,
    blur_kernel: Option<u32>,
    save: Option<bool>,
) -> SketchOptions {
    SketchOptions {
        color: color.unwrap_or(defaults.color),
        blur_kernel: blur_kernel.unwrap_or(defaults.blur_kernel),
        save: save.unwrap_or(defaults.save),
    }
}

/// Collapse a pair of opposing switches into an override.
pub fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

/// `<stem>_sketch.png` inside `dir`.
pub fn sketch_output_path(dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    dir.join(format!("{stem}_sketch.png"))
}

pub fn run(config: &BildwerkConfig, image: &Path, options: &SketchOptions) -> Result<()> {
    run_with_recent(config, image, options, &RecentDirectory::default_location())
}

fn run_with_recent(
    config: &BildwerkConfig,
    image: &Path,
    options: &SketchOptions,
    recent: &RecentDirectory,
) -> Result<()> {
    options.validate()?;

    let path = recent.resolve(image);
    let source = match ImageProcessor::open(&path) {
        Ok(processor) => processor,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Could not open image");
            println!("Error: Could not read the image {}", path.display());
            return Ok(());
        }
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        let dir = std::path::absolute(parent).unwrap_or_else(|_| parent.to_path_buf());
        if let Err(err) = recent.save(&dir) {
            warn!(error = %err, "Could not remember last directory");
        }
    }

    let sketch = pencil_sketch(source.as_dynamic(), options)?;
    if !options.save {
        println!(
            "Sketch created ({}x{}), not saved.",
            sketch.width(),
            sketch.height()
        );
        return Ok(());
    }

    std::fs::create_dir_all(&config.sketch_output_dir)?;
    let output = sketch_output_path(&config.sketch_output_dir, &path);
    ImageProcessor::from_dynamic(sketch).save(&output)?;
    info!(path = %output.display(), color = options.color, "Sketch written");
    println!("Saved sketch to {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn flags_override_defaults() {
        let options =
            options_from_flags(SketchOptions::default(), Some(false), Some(7), Some(false));
        assert_eq!(
            options,
            SketchOptions {
                color: false,
                blur_kernel: 7,
                save: false,
            }
        );
        assert_eq!(
            options_from_flags(SketchOptions::default(), None, None, None),
            SketchOptions::default()
        );
    }

    #[test]
    fn flags_can_turn_configured_off_settings_back_on() {
        let configured = SketchOptions {
            color: false,
            blur_kernel: 9,
            save: false,
        };
        let options = options_from_flags(configured, switch(true, false), None, switch(true, false));
        assert!(options.color);
        assert!(options.save);
        assert_eq!(options.blur_kernel, 9);
    }

    #[test]
    fn switch_without_flags_keeps_config() {
        assert_eq!(switch(false, false), None);
        assert_eq!(switch(false, true), Some(false));
        assert_eq!(switch(true, false), Some(true));
    }

    #[test]
    fn output_name_uses_stem() {
        assert_eq!(
            sketch_output_path(Path::new("output_sketches"), Path::new("photos/cat.jpg")),
            PathBuf::from("output_sketches/cat_sketch.png")
        );
    }

    #[test]
    fn writes_sketch_and_remembers_directory() {
        let root = tempfile::tempdir().expect("tempdir");
        let photos = root.path().join("photos");
        std::fs::create_dir(&photos).expect("mkdir");
        let input = photos.join("cat.png");
        ImageProcessor::from_rgb(RgbImage::from_pixel(24, 16, Rgb([120, 80, 40])))
            .save(&input)
            .expect("fixture");

        let config = BildwerkConfig {
            sketch_output_dir: root.path().join("sketches"),
            ..BildwerkConfig::default()
        };
        let recent = RecentDirectory::in_dir(&root.path().join("data"));
        let options = SketchOptions {
            blur_kernel: 5,
            ..SketchOptions::default()
        };

        run_with_recent(&config, &input, &options, &recent).expect("sketch");

        let written = root.path().join("sketches").join("cat_sketch.png");
        let decoded = ImageProcessor::open(&written).expect("decode").into_rgb8();
        assert_eq!(decoded.dimensions(), (24, 16));
        assert_eq!(recent.load(), Some(photos));
    }

    #[test]
    fn unreadable_image_is_not_fatal() {
        let root = tempfile::tempdir().expect("tempdir");
        let config = BildwerkConfig {
            sketch_output_dir: root.path().join("sketches"),
            ..BildwerkConfig::default()
        };
        let recent = RecentDirectory::in_dir(root.path());
        let result = run_with_recent(
            &config,
            &root.path().join("missing.png"),
            &SketchOptions::default(),
            &recent,
        );
        assert!(result.is_ok());
        assert!(!root.path().join("sketches").exists());
    }
}
