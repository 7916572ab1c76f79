// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Last opened directory — a one-line text file in the data directory.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;

const LAST_DIR_FILE: &str = "last_dir.txt";

/// Per-user Bildwerk data directory. Created on first save, not here.
pub fn data_dir() -> PathBuf {
    data_root(std::env::var_os("XDG_DATA_HOME"), std::env::var_os("HOME")).join("bildwerk")
}

/// `$XDG_DATA_HOME`, else `$HOME/.local/share`, else the working directory.
/// Empty variables count as unset.
fn data_root(xdg_data_home: Option<OsString>, home: Option<OsString>) -> PathBuf {
    let non_empty = |value: Option<OsString>| value.filter(|v| !v.is_empty());
    match (non_empty(xdg_data_home), non_empty(home)) {
        (Some(xdg), _) => PathBuf::from(xdg),
        (None, Some(home)) => Path::new(&home).join(".local").join("share"),
        (None, None) => PathBuf::from("."),
    }
}

/// Remembers the directory the user last opened an image from.
#[derive(Debug, Clone)]
pub struct RecentDirectory {
    file: PathBuf,
}

impl RecentDirectory {
    /// Store the record inside `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self {
            file: data_dir.join(LAST_DIR_FILE),
        }
    }

    /// The record in the default data directory.
    pub fn default_location() -> Self {
        Self::in_dir(&data_dir())
    }

    /// The remembered directory, if one was saved and the line is non-empty.
    pub fn load(&self) -> Option<PathBuf> {
        let line = std::fs::read_to_string(&self.file).ok()?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(PathBuf::from(trimmed))
        }
    }

    pub fn save(&self, dir: &Path) -> Result<()> {
        if let Some(parent) = self.file.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.file, format!("{}\n", dir.display()))?;
        debug!(dir = %dir.display(), "Remembered last directory");
        Ok(())
    }

    /// Resolve a user-supplied path. Relative paths that do not exist from
    /// the working directory are tried against the remembered directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() || path.exists() {
            return path.to_path_buf();
        }
        match self.load() {
            Some(dir) if dir.join(path).exists() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }
}
