// SPDX-License-Identifier: Apache-2.0 WITH LLVM-exception OR MIT
// Copyright (c) 2026 The Frontier Framework Authors

/// Build Management Module
///
/// This module runs the external build toolchains. Every invocation returns
/// its exit status together with the captured output, and callers branch on
/// that status before touching any artifact.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{PackError, Result, Step};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// One external toolchain invocation.
#[derive(Debug, Clone)]
pub struct Toolchain {
    step: Step,
    program: OsString,
    args: Vec<OsString>,
    dir: PathBuf,
    env: BTreeMap<String, String>,
    timeout: Option<Duration>,
}

#[derive(Debug)]
pub struct ToolOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
}

impl Toolchain {
    pub fn new(step: Step, program: impl Into<OsString>, dir: impl Into<PathBuf>) -> Self {
        Toolchain {
            step,
            program: program.into(),
            args: Vec::new(),
            dir: dir.into(),
            env: BTreeMap::new(),
            timeout: None,
        }
    }

    /// Build from a `[program, args...]` vector as written in pack.toml.
    pub fn from_argv(step: Step, argv: &[String], dir: impl Into<PathBuf>) -> Self {
        let (program, args) = match argv.split_first() {
            Some((program, args)) => (program.as_str(), args),
            None => ("", &[][..]),
        };
        Toolchain::new(step, program, dir).args(args)
    }

    /// Run a build script through the host shell, like a user would.
    pub fn script(step: Step, script: &Path, dir: impl Into<PathBuf>) -> Self {
        if cfg!(windows) {
            Toolchain::new(step, "cmd", dir).args([OsString::from("/C"), script.as_os_str().to_owned()])
        } else {
            Toolchain::new(step, "sh", dir).args([script.as_os_str().to_owned()])
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn envs(mut self, env: &BTreeMap<String, String>) -> Self {
        self.env.extend(env.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &OsString {
        &self.program
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Command line as shown in logs and error messages.
    pub fn display_command(&self) -> String {
        std::iter::once(&self.program)
            .chain(&self.args)
            .map(|part| {
                let part = part.to_string_lossy();
                if part.contains(' ') {
                    format!("\"{part}\"")
                } else {
                    part.into_owned()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn command(&self) -> Command {
        let resolved = if cfg!(windows) {
            which::which(&self.program).ok()
        } else {
            None
        };
        let (program, prefix) = launcher(&self.program, resolved, cfg!(windows));

        let mut cmd = Command::new(program);
        cmd.args(prefix)
            .args(&self.args)
            .current_dir(&self.dir)
            .envs(&self.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // Own process group, so a timeout takes down the whole build tree.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }
        cmd
    }

    /// Run to completion and report the exit status, whatever it is.
    pub fn run(&self) -> Result<ToolOutput> {
        let started = Instant::now();
        let deadline = self.timeout.map(|t| started + t);
        tracing::info!("   > {} (in {})", self.display_command(), self.dir.display());

        let mut child = self.command().spawn().map_err(|source| PackError::ToolchainSpawn {
            step: self.step,
            command: self.display_command(),
            dir: self.dir.clone(),
            source,
        })?;

        let (tx, rx) = mpsc::channel();
        if let Some(pipe) = child.stdout.take() {
            drain(pipe, self.step, Stream::Stdout, tx.clone());
        }
        if let Some(pipe) = child.stderr.take() {
            drain(pipe, self.step, Stream::Stderr, tx);
        }

        let status = self.wait(&mut child, deadline)?;
        let (stdout, stderr) = self.collect(rx, deadline);

        let elapsed = started.elapsed();
        tracing::debug!("{} finished with {} after {:.1?}", self.display_command(), status, elapsed);

        Ok(ToolOutput {
            status,
            stdout,
            stderr,
            elapsed,
        })
    }

    /// Run and turn a non-zero exit into `ToolchainFailed`.
    pub fn run_checked(&self) -> Result<ToolOutput> {
        let output = self.run()?;
        if !output.status.success() {
            return Err(PackError::ToolchainFailed {
                step: self.step,
                command: self.display_command(),
                dir: self.dir.clone(),
                status: output.status,
                stderr: output.stderr,
            });
        }
        Ok(output)
    }

    fn wait(&self, child: &mut Child, deadline: Option<Instant>) -> Result<ExitStatus> {
        let wait_err = |e: std::io::Error| PackError::fs("wait for", &self.dir, e);

        let Some(deadline) = deadline else {
            return child.wait().map_err(wait_err);
        };

        loop {
            if let Some(status) = child.try_wait().map_err(wait_err)? {
                return Ok(status);
            }
            if Instant::now() >= deadline {
                kill_tree(child);
                let _ = child.wait();
                return Err(PackError::ToolchainTimeout {
                    step: self.step,
                    command: self.display_command(),
                    dir: self.dir.clone(),
                    secs: self.timeout.map(|t| t.as_secs()).unwrap_or_default(),
                });
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    // Gather output until both pipes close. A background grandchild can keep
    // them open after the child exits; past the deadline the readers are
    // left detached with whatever was captured so far.
    fn collect(&self, rx: Receiver<Chunk>, deadline: Option<Instant>) -> (String, String) {
        let mut stdout = String::new();
        let mut stderr = String::new();
        loop {
            let chunk = match deadline {
                None => match rx.recv() {
                    Ok(chunk) => chunk,
                    Err(_) => break,
                },
                Some(deadline) => {
                    let left = deadline.saturating_duration_since(Instant::now());
                    match rx.recv_timeout(left) {
                        Ok(chunk) => chunk,
                        Err(RecvTimeoutError::Disconnected) => break,
                        Err(RecvTimeoutError::Timeout) => {
                            tracing::warn!(
                                "{} exited but its output is still open, not waiting any longer",
                                self.display_command()
                            );
                            break;
                        }
                    }
                }
            };
            match chunk.stream {
                Stream::Stdout => stdout.push_str(&chunk.text),
                Stream::Stderr => stderr.push_str(&chunk.text),
            }
        }
        (stdout, stderr)
    }
}

/// Program and leading arguments handed to the OS for `program`.
///
/// On Windows a bare name is replaced by the path `which` resolved through
/// PATHEXT, and `.cmd`/`.bat` shims such as `npm.cmd` go through `cmd /C`.
fn launcher(program: &OsStr, resolved: Option<PathBuf>, windows: bool) -> (OsString, Vec<OsString>) {
    let Some(path) = resolved.filter(|_| windows) else {
        return (program.to_owned(), Vec::new());
    };

    let is_shim = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("cmd") || e.eq_ignore_ascii_case("bat"))
        .unwrap_or(false);

    if is_shim {
        (OsString::from("cmd"), vec![OsString::from("/C"), path.into_os_string()])
    } else {
        (path.into_os_string(), Vec::new())
    }
}

// Kill the child together with everything it started.
fn kill_tree(child: &mut Child) {
    let pid = child.id().to_string();

    #[cfg(unix)]
    let status = Command::new("kill")
        .args(["-KILL", "--"])
        .arg(format!("-{pid}"))
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    #[cfg(windows)]
    let status = Command::new("taskkill")
        .args(["/T", "/F", "/PID"])
        .arg(&pid)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    #[cfg(not(any(unix, windows)))]
    let status: std::io::Result<ExitStatus> = Err(std::io::ErrorKind::Unsupported.into());

    if !matches!(status, Ok(s) if s.success()) {
        tracing::debug!("tree kill of {pid} failed, killing the direct child only");
    }
    let _ = child.kill();
}

#[derive(Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

struct Chunk {
    stream: Stream,
    text: String,
}

// Read a child pipe line by line on its own thread so a full pipe never
// blocks the child while we wait on it. Lines are echoed as they arrive.
fn drain<R: Read + Send + 'static>(pipe: R, step: Step, stream: Stream, tx: Sender<Chunk>) {
    thread::spawn(move || {
        let mut reader = BufReader::new(pipe);
        let mut line = Vec::new();
        while let Ok(n) = reader.read_until(b'\n', &mut line) {
            if n == 0 {
                break;
            }
            let text = String::from_utf8_lossy(&line).into_owned();
            tracing::info!(target: "toolchain", "[{step}] {}", text.trim_end());
            if tx.send(Chunk { stream, text }).is_err() {
                break;
            }
            line.clear();
        }
    });
}
