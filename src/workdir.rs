// SPDX-License-Identifier: Apache-2.0 WITH LLVM-exception OR MIT
// Copyright (c) 2026 The Frontier Framework Authors

// Scoped change of the process working directory.
//
// The current directory is process-global, so a guard also holds a global
// lock: two guards in the same process never interleave, and each restores
// exactly the directory it replaced.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::error::{PackError, Result};

static CWD_LOCK: Mutex<()> = Mutex::new(());

pub struct WorkdirGuard {
    previous: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl WorkdirGuard {
    /// Enter `dir` until the guard is dropped.
    pub fn enter(dir: &Path) -> Result<Self> {
        // A panic while another guard was held must not wedge every later build.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let previous = env::current_dir().map_err(|e| PackError::fs("read current directory", ".", e))?;
        env::set_current_dir(dir).map_err(|e| PackError::fs("enter", dir, e))?;
        tracing::debug!("entered {}", dir.display());

        Ok(WorkdirGuard {
            previous,
            _lock: lock,
        })
    }

    pub fn previous(&self) -> &Path {
        &self.previous
    }
}

impl Drop for WorkdirGuard {
    fn drop(&mut self) {
        if let Err(e) = env::set_current_dir(&self.previous) {
            tracing::error!("failed to restore working directory {}: {}", self.previous.display(), e);
        } else {
            tracing::debug!("restored {}", self.previous.display());
        }
    }
}
