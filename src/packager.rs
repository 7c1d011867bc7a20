// SPDX-License-Identifier: Apache-2.0 WITH LLVM-exception OR MIT
// Copyright (c) 2026 The Frontier Framework Authors

// The packaging pipeline: preflight, reset the staging directory, build and
// stage the backend, build and stage the frontend.
//
// Steps run strictly in order and the first error aborts the run. There is
// no resumption; every run starts again from a clean staging directory.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::backend;
use crate::config::PackConfig;
use crate::error::{PackError, Result};
use crate::frontend;
use crate::platform::Platform;
use crate::preflight;
use crate::staging;

pub struct Packager {
    root: PathBuf,
    config: PackConfig,
    platform: Platform,
}

/// What a successful run put into the staging directory.
#[derive(Debug, Clone)]
pub struct PackReport {
    pub platform: Platform,
    pub staging: PathBuf,
    pub backend: PathBuf,
    pub frontend: PathBuf,
    pub elapsed: Duration,
}

impl Packager {
    /// `root` is made absolute up front, since the frontend step temporarily
    /// changes the working directory. It is not canonicalized: on Windows
    /// that yields `\\?\` paths which `cmd` and npm refuse to run in.
    pub fn new(root: &Path, config: PackConfig, platform: Platform) -> Result<Self> {
        let root = std::path::absolute(root).map_err(|e| PackError::fs("resolve", root, e))?;
        if !root.is_dir() {
            return Err(PackError::fs(
                "resolve",
                &root,
                io::Error::new(io::ErrorKind::NotFound, "project root is not a directory"),
            ));
        }
        Ok(Packager {
            root,
            config,
            platform,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &PackConfig {
        &self.config
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.root.join(&self.config.staging)
    }

    pub fn preflight(&self) -> Result<()> {
        preflight::check(&self.root, &self.config, &self.platform)
    }

    /// Create the staging directory and clear the previous run's artifacts.
    pub fn reset_staging(&self) -> Result<()> {
        tracing::info!("🧹 Resetting {} ...", self.staging_dir().display());
        staging::reset(
            &self.staging_dir(),
            &self.config.backend.binary,
            &self.config.frontend,
        )
    }

    pub fn build_backend(&self) -> Result<PathBuf> {
        backend::build_and_relocate(
            &self.root,
            &self.staging_dir(),
            &self.config.backend,
            &self.platform,
            self.config.timeout(),
        )
    }

    pub fn build_frontend(&self) -> Result<PathBuf> {
        frontend::build_and_relocate(
            &self.root,
            &self.staging_dir(),
            &self.config.frontend,
            self.config.timeout(),
        )
    }

    pub fn run(&self) -> Result<PackReport> {
        let started = Instant::now();

        self.preflight()?;
        self.reset_staging()?;
        let backend = self.build_backend()?;
        let frontend = self.build_frontend()?;

        Ok(PackReport {
            platform: self.platform.clone(),
            staging: self.staging_dir(),
            backend,
            frontend,
            elapsed: started.elapsed(),
        })
    }
}
