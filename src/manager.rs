// SPDX-License-Identifier: Apache-2.0 WITH LLVM-exception OR MIT
// Copyright (c) 2026 The Frontier Framework Authors

/// Packager - Build System and Package Orchestrator
///
/// The binary is responsible for:
/// - Reading the project configuration and command-line overrides
/// - Detecting the target platform
/// - Running the packaging pipeline
/// - Reporting the staged layout and waiting for acknowledgment

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use packager::config::{self, CONFIG_FILE};
use packager::{PackConfig, PackReport, Packager, Platform};

#[derive(Parser, Debug)]
#[command(name = "packager", version, about = "Build the backend and frontend into a single pack directory")]
struct Cli {
    /// Project root containing the backend and frontend projects
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Configuration file (default: <root>/pack.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Target platform instead of the detected host (windows, linux, macos, ...)
    #[arg(long)]
    platform: Option<Platform>,

    /// Exit without waiting for Enter
    #[arg(long, env = "PACKAGER_NO_WAIT")]
    no_wait: bool,

    /// Only run the preflight checks
    #[arg(long)]
    check: bool,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .without_time()
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install logger: {e}");
    }

    if let Err(e) = run(cli) {
        eprintln!("\n❌ Packaging failed: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    println!("🚀 PACKAGER");

    let config_path = cli.config.clone().unwrap_or_else(|| cli.root.join(CONFIG_FILE));
    let pack_config = config::load_config(&config_path)?;

    let platform = cli.platform.clone().unwrap_or_else(Platform::detect);
    let packager = Packager::new(&cli.root, pack_config, platform)?;

    if cli.check {
        packager.preflight()?;
        return Ok(());
    }

    let report = packager.run()?;
    print_summary(&report);

    if should_wait(packager.config(), cli.no_wait, io::stdin().is_terminal()) {
        wait_for_enter()?;
    }
    Ok(())
}

// The Enter prompt only makes sense for a person at a terminal.
fn should_wait(config: &PackConfig, no_wait: bool, stdin_is_tty: bool) -> bool {
    config.interactive && !no_wait && stdin_is_tty
}

fn print_summary(report: &PackReport) {
    println!("\n✅ SUCCESS! ({:.1?}, target {})", report.elapsed, report.platform);
    println!("📁 Backend:  {}", report.backend.display());
    println!("📁 Frontend: {}", report.frontend.display());
}

fn wait_for_enter() -> Result<()> {
    print!("Packaging finished, press Enter to exit...");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(())
}
