// SPDX-License-Identifier: Apache-2.0 WITH LLVM-exception OR MIT
// Copyright (c) 2026 The Frontier Framework Authors

// Platform Detection Module
//
// The target platform decides two things for the backend step: which
// build branch runs, and whether the executable carries an `.exe` suffix.
// Both decisions go through `Platform::is_windows` so they cannot drift apart.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Linux,
    MacOs,
    Other(String),
}

impl Platform {
    /// Platform of the host this binary was compiled for.
    pub fn detect() -> Self {
        Self::from_os_name(std::env::consts::OS)
    }

    fn from_os_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "windows" | "win" | "win32" | "win64" => Platform::Windows,
            "linux" => Platform::Linux,
            "macos" | "darwin" | "osx" => Platform::MacOs,
            other => Platform::Other(other.to_string()),
        }
    }

    pub fn is_windows(&self) -> bool {
        matches!(self, Platform::Windows)
    }

    /// File name of an executable called `stem` on this platform.
    pub fn executable_name(&self, stem: &str) -> String {
        if self.is_windows() {
            format!("{stem}.exe")
        } else {
            stem.to_string()
        }
    }

    /// Every name an executable called `stem` may have across platforms.
    pub fn all_executable_names(stem: &str) -> [String; 2] {
        [
            Platform::Linux.executable_name(stem),
            Platform::Windows.executable_name(stem),
        ]
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Windows => f.write_str("windows"),
            Platform::Linux => f.write_str("linux"),
            Platform::MacOs => f.write_str("macos"),
            Platform::Other(name) => f.write_str(name),
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err("platform name cannot be empty".to_string());
        }
        Ok(Self::from_os_name(s))
    }
}
