// SPDX-License-Identifier: Apache-2.0 WITH LLVM-exception OR MIT
// Copyright (c) 2026 The Frontier Framework Authors

/// Configuration Management Module
///
/// This module handles reading and parsing the pack.toml configuration file.
/// Every key is optional; an absent file yields the defaults below, which
/// describe the standard `backend/main` + `frontend` project layout.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PackError, Result};
use crate::platform::Platform;

pub const CONFIG_FILE: &str = "pack.toml";

const DEFAULT_TIMEOUT_SECS: u64 = 30 * 60;

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PackConfig {
    /// Staging directory, relative to the project root.
    pub staging: PathBuf,
    /// Block for acknowledgment before the process exits.
    pub interactive: bool,
    /// Upper bound for each toolchain invocation; `0` disables it.
    pub timeout_secs: u64,
    pub backend: BackendConfig,
    pub frontend: FrontendConfig,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BackendConfig {
    /// Backend project directory; the build writes its binary here.
    pub dir: PathBuf,
    /// Executable stem, `.exe` is appended for Windows targets.
    pub binary: String,
    /// Direct build command for Windows targets, run inside `dir`.
    /// `%OUT%` expands to the executable file name.
    pub command: Vec<String>,
    /// Build script for every other target, run from the project root.
    pub script: PathBuf,
    /// Extra environment passed to the backend toolchain.
    pub env: BTreeMap<String, String>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FrontendConfig {
    pub dir: PathBuf,
    pub command: Vec<String>,
    /// Output folder the toolchain writes, relative to `dir`.
    pub output: PathBuf,
    /// Canonical folder name inside the staging directory.
    pub name: String,
}

impl Default for PackConfig {
    fn default() -> Self {
        PackConfig {
            staging: PathBuf::from("pack"),
            interactive: true,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            backend: BackendConfig::default(),
            frontend: FrontendConfig::default(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig {
            dir: PathBuf::from("backend/main"),
            binary: "main".into(),
            command: ["go", "build", "-x", "-v", "-o", "%OUT%"]
                .map(String::from)
                .to_vec(),
            script: PathBuf::from("buildback.sh"),
            env: BTreeMap::new(),
        }
    }
}

impl Default for FrontendConfig {
    fn default() -> Self {
        FrontendConfig {
            dir: PathBuf::from("frontend"),
            command: ["npm", "run", "build"].map(String::from).to_vec(),
            output: PathBuf::from("dist"),
            name: "front".into(),
        }
    }
}

impl PackConfig {
    pub fn timeout(&self) -> Option<std::time::Duration> {
        (self.timeout_secs > 0).then(|| std::time::Duration::from_secs(self.timeout_secs))
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let invalid = |message: &str| PackError::Config {
            path: path.to_path_buf(),
            message: message.to_string(),
        };

        if self.staging.as_os_str().is_empty() {
            return Err(invalid("`staging` cannot be empty"));
        }
        if self.backend.binary.trim().is_empty() {
            return Err(invalid("`backend.binary` cannot be empty"));
        }
        if self.backend.command.is_empty() {
            return Err(invalid("`backend.command` needs at least a program"));
        }
        if self.frontend.command.is_empty() {
            return Err(invalid("`frontend.command` needs at least a program"));
        }
        if !is_plain_name(&self.frontend.name) {
            return Err(invalid("`frontend.name` must be a single folder name"));
        }
        let Some(output) = self.frontend.output.file_name() else {
            return Err(invalid("`frontend.output` must end in a folder name"));
        };

        // Both names end up next to the executable in the staging directory.
        let executables = Platform::all_executable_names(&self.backend.binary);
        let collides = |name: &str| executables.iter().any(|exe| exe.eq_ignore_ascii_case(name));
        if collides(&self.frontend.name) {
            return Err(invalid("`frontend.name` collides with the backend executable name"));
        }
        if collides(&output.to_string_lossy()) {
            return Err(invalid("`frontend.output` collides with the backend executable name"));
        }
        Ok(())
    }
}

fn is_plain_name(name: &str) -> bool {
    let path = Path::new(name);
    !name.is_empty() && path.file_name().map(|f| f == path.as_os_str()).unwrap_or(false)
}

/// Load the pack.toml configuration file.
///
/// A missing file is not an error. A file that exists but does not parse is.
pub fn load_config(config_path: &Path) -> Result<PackConfig> {
    if !config_path.exists() {
        tracing::debug!("no {} found, using defaults", config_path.display());
        return Ok(PackConfig::default());
    }

    let content = fs::read_to_string(config_path)
        .map_err(|e| PackError::fs("read", config_path, e))?;
    parse_config(&content, config_path)
}

pub fn parse_config(content: &str, origin: &Path) -> Result<PackConfig> {
    let config: PackConfig = toml::from_str(content).map_err(|e| PackError::Config {
        path: origin.to_path_buf(),
        message: e.to_string(),
    })?;
    config.validate(origin)?;
    Ok(config)
}
