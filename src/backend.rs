// SPDX-License-Identifier: Apache-2.0 WITH LLVM-exception OR MIT
// Copyright (c) 2026 The Frontier Framework Authors

// Backend Processing Module
//
// This module compiles the backend and moves its executable into the
// staging directory. Windows targets run the direct build command inside the
// backend project; every other target goes through the project's build
// script.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::assets;
use crate::build::Toolchain;
use crate::config::BackendConfig;
use crate::error::{Result, Step};
use crate::platform::Platform;

/// Placeholder in `backend.command` replaced by the executable file name.
pub const OUT_PLACEHOLDER: &str = "%OUT%";

/// Toolchain invocation that produces the backend executable for `platform`.
pub fn toolchain(root: &Path, config: &BackendConfig, platform: &Platform) -> Toolchain {
    let backend_dir = root.join(&config.dir);

    let tool = if platform.is_windows() {
        let exe_name = platform.executable_name(&config.binary);
        let argv: Vec<String> = config
            .command
            .iter()
            .map(|part| part.replace(OUT_PLACEHOLDER, &exe_name))
            .collect();
        Toolchain::from_argv(Step::Backend, &argv, backend_dir)
    } else {
        Toolchain::script(Step::Backend, &root.join(&config.script), root)
    };

    tool.envs(&config.env)
}

/// Build the backend and move its executable into `staging`.
///
/// The toolchain's exit status is checked before anything is moved, so a
/// failed build never leaves a partial artifact in the staging directory.
pub fn build_and_relocate(
    root: &Path,
    staging: &Path,
    config: &BackendConfig,
    platform: &Platform,
    timeout: Option<Duration>,
) -> Result<PathBuf> {
    let exe_name = platform.executable_name(&config.binary);
    tracing::info!("⚙️  Compiling backend for {} ...", platform);

    let output = toolchain(root, config, platform)
        .timeout(timeout)
        .run_checked()?;
    tracing::debug!("backend toolchain took {:.1?}", output.elapsed);

    let src = root.join(&config.dir).join(&exe_name);
    let dst = staging.join(&exe_name);
    assets::move_file(Step::Backend, &src, &dst)?;

    tracing::info!("✅ Backend staged at {}", dst.display());
    Ok(dst)
}
