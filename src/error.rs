// SPDX-License-Identifier: Apache-2.0 WITH LLVM-exception OR MIT
// Copyright (c) 2026 The Frontier Framework Authors

// Error taxonomy for a packaging run.
//
// Every variant is fatal. The `Display` text names the failing step, the
// command that was attempted and the path involved.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PackError>;

/// Pipeline stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Preflight,
    Staging,
    Backend,
    Frontend,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Step::Preflight => "preflight",
            Step::Staging => "staging",
            Step::Backend => "backend",
            Step::Frontend => "frontend",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum PackError {
    #[error("{step} build failed: `{command}` in {} exited with {status}{}", .dir.display(), stderr_suffix(.stderr))]
    ToolchainFailed {
        step: Step,
        command: String,
        dir: PathBuf,
        status: ExitStatus,
        stderr: String,
    },

    #[error("{step} build could not start `{command}` in {}: {source}", .dir.display())]
    ToolchainSpawn {
        step: Step,
        command: String,
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{step} build timed out after {secs}s: `{command}` in {}", .dir.display())]
    ToolchainTimeout {
        step: Step,
        command: String,
        dir: PathBuf,
        secs: u64,
    },

    #[error("{step} toolchain `{program}` was not found on PATH")]
    ToolchainMissing { step: Step, program: String },

    #[error("{step} project not found at {}", .path.display())]
    ProjectMissing { step: Step, path: PathBuf },

    #[error("{step} artifact not found at {} (expected to move it to {})", .from.display(), .to.display())]
    ArtifactNotFound {
        step: Step,
        from: PathBuf,
        to: PathBuf,
    },

    #[error("failed to {op} {}: {source}", .path.display())]
    Filesystem {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

impl PackError {
    pub(crate) fn fs(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        PackError::Filesystem {
            op,
            path: path.into(),
            source,
        }
    }

    /// Stage the error belongs to, when it is tied to one.
    pub fn step(&self) -> Option<Step> {
        match self {
            PackError::ToolchainFailed { step, .. }
            | PackError::ToolchainSpawn { step, .. }
            | PackError::ToolchainTimeout { step, .. }
            | PackError::ToolchainMissing { step, .. }
            | PackError::ProjectMissing { step, .. }
            | PackError::ArtifactNotFound { step, .. } => Some(*step),
            PackError::Filesystem { .. } | PackError::Config { .. } => None,
        }
    }
}

// Only the last few lines of a toolchain's stderr end up in the message.
const STDERR_TAIL_LINES: usize = 12;

fn stderr_suffix(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return String::new();
    }
    let tail = &lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..];
    format!("\n{}", tail.join("\n"))
}
