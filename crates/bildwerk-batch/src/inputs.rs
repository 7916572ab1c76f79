// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Input discovery for the batch runners.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use bildwerk_core::{BATCH_IMAGE_EXTENSIONS, has_image_extension};
use tracing::{debug, instrument};

/// Regular files in `dir` as `(file name, path)` pairs, in listing order.
/// Names that are not UTF-8 are matched lossily; the path stays exact. A
/// missing or unreadable directory yields nothing.
fn list_files(dir: &Path) -> Vec<(String, PathBuf)> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            debug!(dir = %dir.display(), error = %err, "Input directory not readable");
            return Vec::new();
        }
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            (name, entry.path())
        })
        .collect()
}

/// Files matching `*.jpg`, `*.jpeg` and `*.png` exactly (case-sensitive),
/// grouped by pattern in that order. Hidden files are skipped, as a shell glob
/// would.
#[instrument]
pub fn enumerate_batch_inputs(dir: &Path) -> Vec<PathBuf> {
    let files = list_files(dir);
    let mut matched = Vec::new();
    for ext in BATCH_IMAGE_EXTENSIONS {
        let suffix = format!(".{ext}");
        matched.extend(
            files
                .iter()
                .filter(|(name, _)| !name.starts_with('.') && name.ends_with(&suffix))
                .map(|(_, path)| path.clone()),
        );
    }
    debug!(count = matched.len(), "Batch inputs enumerated");
    matched
}

/// Files with a supported image extension in any letter case, in listing
/// order.
pub fn enumerate_any_case(dir: &Path) -> Vec<PathBuf> {
    list_files(dir)
        .into_iter()
        .filter(|(name, _)| has_image_extension(name))
        .map(|(_, path)| path)
        .collect()
}

/// `prefix` + the input's file name; directories are dropped.
pub fn prefixed_output_name(prefix: &str, input: &Path) -> Option<OsString> {
    let mut name = OsString::from(prefix);
    name.push(input.file_name()?);
    Some(name)
}
