// SPDX-License-Identifier: Apache-2.0 WITH LLVM-exception OR MIT
// Copyright (c) 2026 The Frontier Framework Authors

// Assets Management Module
//
// This module moves build artifacts (the backend executable and the frontend
// output folder) into the staging directory. A plain rename is tried first;
// when source and destination sit on different filesystems the tree is
// copied with walkdir and the source removed afterwards.

use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::error::{PackError, Result, Step};

/// Move a single file, failing with `ArtifactNotFound` if it was never built.
pub fn move_file(step: Step, src: &Path, dst: &Path) -> Result<()> {
    if !src.is_file() {
        return Err(PackError::ArtifactNotFound {
            step,
            from: src.to_path_buf(),
            to: dst.to_path_buf(),
        });
    }

    if let Err(rename_err) = fs::rename(src, dst) {
        tracing::debug!("rename {} failed ({}), copying instead", src.display(), rename_err);
        fs::copy(src, dst).map_err(|e| PackError::fs("copy", src, e))?;
        fs::remove_file(src).map_err(|e| PackError::fs("remove", src, e))?;
    }
    Ok(())
}

/// Move a directory tree to `dst`, which must not exist yet.
pub fn move_dir(step: Step, src: &Path, dst: &Path) -> Result<()> {
    if !src.is_dir() {
        return Err(PackError::ArtifactNotFound {
            step,
            from: src.to_path_buf(),
            to: dst.to_path_buf(),
        });
    }

    if let Err(rename_err) = fs::rename(src, dst) {
        tracing::debug!("rename {} failed ({}), copying instead", src.display(), rename_err);
        copy_tree(src, dst)?;
        fs::remove_dir_all(src).map_err(|e| PackError::fs("remove", src, e))?;
    }
    Ok(())
}

/// Recursively copy `src` into a new directory `dst`, keeping the layout.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            PackError::fs("walk", path, e.into())
        })?;

        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let dest_path = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest_path).map_err(|e| PackError::fs("create", &dest_path, e))?;
        } else {
            if let Some(parent) = dest_path.parent() {
                fs::create_dir_all(parent).map_err(|e| PackError::fs("create", parent, e))?;
            }
            fs::copy(entry.path(), &dest_path).map_err(|e| PackError::fs("copy", entry.path(), e))?;
        }
    }
    Ok(())
}
