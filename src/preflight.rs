// SPDX-License-Identifier: Apache-2.0 WITH LLVM-exception OR MIT
// Copyright (c) 2026 The Frontier Framework Authors

// Checks run before anything on disk is touched: both project directories
// exist, the backend build script exists where one is needed, and every
// toolchain program resolves.

use std::path::Path;

use crate::backend;
use crate::build::Toolchain;
use crate::config::PackConfig;
use crate::error::{PackError, Result, Step};
use crate::platform::Platform;

pub fn check(root: &Path, config: &PackConfig, platform: &Platform) -> Result<()> {
    tracing::info!("🔍 Running preflight checks for {} ...", platform);

    require_dir(Step::Backend, &root.join(&config.backend.dir))?;
    require_dir(Step::Frontend, &root.join(&config.frontend.dir))?;

    if !platform.is_windows() {
        let script = root.join(&config.backend.script);
        if !script.is_file() {
            return Err(PackError::ProjectMissing {
                step: Step::Backend,
                path: script,
            });
        }
    }

    let backend_tool = backend::toolchain(root, &config.backend, platform);
    require_program(Step::Backend, &backend_tool)?;

    let frontend_tool = Toolchain::from_argv(
        Step::Frontend,
        &config.frontend.command,
        root.join(&config.frontend.dir),
    );
    require_program(Step::Frontend, &frontend_tool)?;

    tracing::info!("✅ Preflight checks passed");
    Ok(())
}

fn require_dir(step: Step, path: &Path) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(PackError::ProjectMissing {
            step,
            path: path.to_path_buf(),
        })
    }
}

// Bare names go through PATH; anything with a separator is taken relative to
// the directory the toolchain runs in.
fn require_program(step: Step, tool: &Toolchain) -> Result<()> {
    let program = Path::new(tool.program());
    let found = if program.components().count() > 1 {
        tool.dir().join(program).is_file()
    } else {
        which::which(program).is_ok()
    };

    if found {
        tracing::debug!("found {}", program.display());
        Ok(())
    } else {
        Err(PackError::ToolchainMissing {
            step,
            program: program.display().to_string(),
        })
    }
}
