// SPDX-License-Identifier: Apache-2.0 WITH LLVM-exception OR MIT
// Copyright (c) 2026 The Frontier Framework Authors

// Frontend Build Module
//
// Runs the frontend toolchain from inside the frontend project, then moves
// its output folder into the staging directory under the canonical name.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::assets;
use crate::build::{ToolOutput, Toolchain};
use crate::config::FrontendConfig;
use crate::error::{PackError, Result, Step};
use crate::staging;
use crate::workdir::WorkdirGuard;

/// Build the frontend and stage its output as `<staging>/<config.name>`.
pub fn build_and_relocate(
    root: &Path,
    staging_dir: &Path,
    config: &FrontendConfig,
    timeout: Option<Duration>,
) -> Result<PathBuf> {
    // Absolute, since the toolchain runs after the working directory moved.
    let frontend_dir = std::path::absolute(root.join(&config.dir))
        .map_err(|e| PackError::fs("resolve", root.join(&config.dir), e))?;
    if !frontend_dir.is_dir() {
        return Err(PackError::ProjectMissing {
            step: Step::Frontend,
            path: frontend_dir,
        });
    }
    tracing::info!("📦 Building frontend in {} ...", frontend_dir.display());

    let output = run_inside(&frontend_dir, config, timeout)?;
    tracing::debug!("frontend toolchain took {:.1?}", output.elapsed);

    let src = frontend_dir.join(&config.output);
    let Some(output_name) = config.output.file_name() else {
        return Err(PackError::Config {
            path: config.output.clone(),
            message: "`frontend.output` must end in a folder name".into(),
        });
    };
    let intermediate = staging_dir.join(output_name);
    let canonical = staging_dir.join(&config.name);

    if !src.is_dir() {
        return Err(PackError::ArtifactNotFound {
            step: Step::Frontend,
            from: src,
            to: canonical,
        });
    }

    staging::remove_path(&intermediate)?;
    staging::remove_path(&canonical)?;

    assets::move_dir(Step::Frontend, &src, &intermediate)?;
    if intermediate != canonical {
        fs::rename(&intermediate, &canonical).map_err(|e| PackError::fs("rename", &intermediate, e))?;
    }

    tracing::info!("✅ Frontend staged at {}", canonical.display());
    Ok(canonical)
}

// The working directory only changes for the duration of the toolchain
// call; the guard puts it back even when the build fails.
fn run_inside(frontend_dir: &Path, config: &FrontendConfig, timeout: Option<Duration>) -> Result<ToolOutput> {
    let _cwd = WorkdirGuard::enter(frontend_dir)?;
    Toolchain::from_argv(Step::Frontend, &config.command, frontend_dir)
        .timeout(timeout)
        .run_checked()
}
