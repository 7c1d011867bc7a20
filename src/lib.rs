// SPDX-License-Identifier: Apache-2.0 WITH LLVM-exception OR MIT
// Copyright (c) 2026 The Frontier Framework Authors

// Packager - Build and Stage Orchestrator
//
// Compiles the backend, builds the frontend bundle and assembles both into
// one staging directory:
//
//   pack/
//     main        (main.exe for Windows targets)
//     front/      (the frontend toolchain's output folder, renamed)

pub mod assets;
pub mod backend;
pub mod build;
pub mod config;
pub mod error;
pub mod frontend;
pub mod packager;
pub mod platform;
pub mod preflight;
pub mod staging;
pub mod workdir;

pub use config::PackConfig;
pub use error::{PackError, Result, Step};
pub use packager::{PackReport, Packager};
pub use platform::Platform;
