// SPDX-License-Identifier: Apache-2.0 WITH LLVM-exception OR MIT
// Copyright (c) 2026 The Frontier Framework Authors

// Staging Directory Module
//
// The staging directory is never wiped as a whole. Only the entries a
// previous run could have produced are removed, so anything else a user keeps
// next to the pack (configs, READMEs) survives.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::FrontendConfig;
use crate::error::{PackError, Result};
use crate::platform::Platform;

/// Entries of `staging` a previous run may have left behind.
pub fn stale_entries(staging: &Path, binary: &str, frontend: &FrontendConfig) -> Vec<PathBuf> {
    let mut entries: Vec<PathBuf> = Platform::all_executable_names(binary)
        .iter()
        .map(|name| staging.join(name))
        .collect();

    entries.push(staging.join(&frontend.name));
    if let Some(intermediate) = frontend.output.file_name() {
        let intermediate = staging.join(intermediate);
        if !entries.contains(&intermediate) {
            entries.push(intermediate);
        }
    }
    entries
}

/// Create `staging` if needed and clear the previous run's artifacts from it.
pub fn reset(staging: &Path, binary: &str, frontend: &FrontendConfig) -> Result<()> {
    if !staging.is_dir() {
        tracing::debug!("creating {}", staging.display());
    }
    fs::create_dir_all(staging).map_err(|e| PackError::fs("create", staging, e))?;

    for entry in stale_entries(staging, binary, frontend) {
        if remove_path(&entry)? {
            tracing::info!("🧹 Removed {}", entry.display());
        }
    }
    Ok(())
}

/// Remove a file or directory tree. Returns whether anything was there.
pub fn remove_path(path: &Path) -> Result<bool> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(PackError::fs("inspect", path, e)),
    };

    if meta.is_dir() {
        fs::remove_dir_all(path).map_err(|e| PackError::fs("remove", path, e))?;
    } else {
        fs::remove_file(path).map_err(|e| PackError::fs("remove", path, e))?;
    }
    Ok(true)
}
