// SPDX-License-Identifier: Apache-2.0 WITH LLVM-exception OR MIT
// Copyright (c) 2026 The Frontier Framework Authors

#![cfg(unix)]


use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use packager::workdir::WorkdirGuard;
use packager::{PackError, Platform, Step};
use test_support::{sh, tree, Project};

#[test]
fn stages_platform_named_backend_and_canonical_frontend() {
    for (platform, exe, other) in [
        (Platform::Linux, "main", "main.exe"),
        (Platform::MacOs, "main", "main.exe"),
        (Platform::Windows, "main.exe", "main"),
    ] {
        let project = Project::new();
        let report = project.packager(platform.clone()).run().unwrap();

        let staging = project.staging();
        assert_eq!(report.backend, staging.join(exe));
        assert_eq!(report.frontend, staging.join("front"));
        assert!(staging.join(exe).is_file(), "{platform}");
        assert!(!staging.join(other).exists(), "{platform}");
        assert_eq!(
            tree(&staging),
            vec![
                "front/".to_string(),
                "front/assets/".to_string(),
                "front/assets/app.js".to_string(),
                "front/index.html".to_string(),
                exe.to_string(),
            ],
            "{platform}"
        );
        // Artifacts were moved, not copied.
        assert!(!project.root().join("backend/main").join(exe).exists());
        assert!(!project.root().join("frontend/dist").exists());
    }
}

#[test]
fn running_twice_yields_the_same_layout() {
    let project = Project::new();
    let packager = project.packager(Platform::Linux);

    packager.run().unwrap();
    let first = tree(&project.staging());
    let first_index = fs::read_to_string(project.staging().join("front/index.html")).unwrap();

    packager.run().unwrap();
    assert_eq!(tree(&project.staging()), first);
    assert_eq!(
        fs::read_to_string(project.staging().join("front/index.html")).unwrap(),
        first_index
    );
    assert!(!project.staging().join("front/dist").exists());
}

#[test]
fn missing_staging_directory_is_created() {
    let mut project = Project::new();
    project.config.staging = "out/release/pack".into();
    assert!(!project.staging().exists());

    project.packager(Platform::Linux).run().unwrap();
    assert!(project.staging().join("main").is_file());
    assert!(project.staging().join("front").is_dir());
}

#[test]
fn failing_backend_aborts_before_relocation() {
    let project = Project::new();
    project.backend_script("echo 'compile error: undefined: handler' >&2\nexit 2\n");
    fs::create_dir_all(project.staging()).unwrap();
    fs::write(project.staging().join("main"), "stale").unwrap();

    let err = project.packager(Platform::Linux).run().unwrap_err();
    match &err {
        PackError::ToolchainFailed { step, status, stderr, .. } => {
            assert_eq!(*step, Step::Backend);
            assert_eq!(status.code(), Some(2));
            assert!(stderr.contains("undefined: handler"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("buildback.sh"));

    let staging = project.staging();
    assert!(!staging.join("main").exists());
    assert!(!staging.join("main.exe").exists());
    assert!(!staging.join("front").exists(), "frontend must not run after a backend failure");
}

#[test]
fn backend_that_exits_cleanly_without_a_binary_is_reported() {
    let project = Project::new();
    project.backend_script("echo 'nothing to do'\n");

    let err = project.packager(Platform::Linux).run().unwrap_err();
    match err {
        PackError::ArtifactNotFound { step, from, to } => {
            assert_eq!(step, Step::Backend);
            assert!(from.ends_with("backend/main/main"));
            assert_eq!(to, project.staging().join("main"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn frontend_without_output_folder_fails_descriptively() {
    let mut project = Project::new();
    project.config.frontend.command = sh("echo 'vite: nothing emitted'");

    let err = project.packager(Platform::Linux).run().unwrap_err();
    let message = err.to_string();
    match &err {
        PackError::ArtifactNotFound { step, from, .. } => {
            assert_eq!(*step, Step::Frontend);
            assert!(from.ends_with("frontend/dist"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(message.starts_with("frontend artifact not found"), "{message}");
    assert!(message.contains("front"), "{message}");

    // The backend half was already staged when the frontend failed.
    assert!(project.staging().join("main").is_file());
    assert!(!project.staging().join("front").exists());
}

#[test]
fn failing_frontend_build_is_not_mistaken_for_missing_output() {
    let mut project = Project::new();
    project.config.frontend.command = sh("mkdir -p dist; echo 'error TS2304' >&2; exit 1");

    let err = project.packager(Platform::Linux).run().unwrap_err();
    assert!(matches!(err, PackError::ToolchainFailed { step: Step::Frontend, .. }));
    assert!(!project.staging().join("front").exists());
}

#[test]
fn stale_artifacts_are_replaced_on_a_unix_run() {
    let project = Project::new();
    let staging = project.staging();
    fs::create_dir_all(staging.join("front/old")).unwrap();
    fs::write(staging.join("front/old/bundle.js"), "old").unwrap();
    fs::write(staging.join("front/index.html"), "<html>old</html>").unwrap();
    fs::write(staging.join("main.exe"), "old windows binary").unwrap();

    project.packager(Platform::Linux).run().unwrap();

    assert!(!staging.join("main.exe").exists());
    assert_eq!(fs::read_to_string(staging.join("main")).unwrap().trim(), "binary");
    assert_eq!(
        tree(&staging.join("front")),
        vec!["assets/", "assets/app.js", "index.html"]
    );
    assert_eq!(
        fs::read_to_string(staging.join("front/index.html")).unwrap().trim(),
        "<html>new</html>"
    );
}

#[test]
fn working_directory_is_restored_after_a_failed_frontend_build() {
    let before = WorkdirGuard::enter(Path::new(".")).unwrap().previous().to_path_buf();

    let mut project = Project::new();
    project.config.frontend.command = sh("exit 9");
    let err = project.packager(Platform::Linux).run().unwrap_err();
    assert!(matches!(err, PackError::ToolchainFailed { step: Step::Frontend, .. }));

    let after = WorkdirGuard::enter(Path::new(".")).unwrap().previous().to_path_buf();
    assert_eq!(before, after);
}

#[test]
fn frontend_toolchain_runs_inside_the_frontend_project() {
    let mut project = Project::new();
    project.config.frontend.command = sh("mkdir -p dist && basename \"$(pwd)\" > dist/where.txt");

    project.packager(Platform::Linux).run().unwrap();
    assert_eq!(
        fs::read_to_string(project.staging().join("front/where.txt")).unwrap().trim(),
        "frontend"
    );
}

#[test]
fn hung_toolchain_is_killed_after_the_timeout() {
    let mut project = Project::new();
    project.config.timeout_secs = 1;
    project.config.frontend.command = sh("exec sleep 10");

    let started = Instant::now();
    let err = project.packager(Platform::Linux).run().unwrap_err();
    assert!(matches!(err, PackError::ToolchainTimeout { step: Step::Frontend, secs: 1, .. }));
    assert!(started.elapsed() < Duration::from_secs(8));
}

#[test]
fn preflight_failure_leaves_staging_untouched() {
    let project = Project::new();
    fs::remove_dir_all(project.root().join("frontend")).unwrap();
    fs::create_dir_all(project.staging()).unwrap();
    fs::write(project.staging().join("main"), "previous release").unwrap();

    let err = project.packager(Platform::Linux).run().unwrap_err();
    assert!(matches!(err, PackError::ProjectMissing { step: Step::Frontend, .. }));
    assert_eq!(
        fs::read_to_string(project.staging().join("main")).unwrap(),
        "previous release"
    );
}

#[test]
fn custom_layout_from_configuration() {
    let mut project = Project::new();
    fs::create_dir_all(project.root().join("server")).unwrap();
    fs::create_dir_all(project.root().join("web")).unwrap();
    project.config.backend.dir = "server".into();
    project.config.backend.binary = "api".into();
    project.config.backend.script = "scripts/build.sh".into();
    project.config.backend.env.insert("PACK_FLAVOR".into(), "release".into());
    project.config.frontend.dir = "web".into();
    project.config.frontend.output = "build".into();
    project.config.frontend.name = "static".into();
    project.config.frontend.command = sh("mkdir -p build && echo ok > build/index.html");

    fs::create_dir_all(project.root().join("scripts")).unwrap();
    fs::write(
        project.root().join("scripts/build.sh"),
        "echo \"$PACK_FLAVOR\" > server/api\n",
    )
    .unwrap();

    project.packager(Platform::Linux).run().unwrap();

    let staging = project.staging();
    assert_eq!(tree(&staging), vec!["api", "static/", "static/index.html"]);
    assert_eq!(fs::read_to_string(staging.join("api")).unwrap().trim(), "release");
}

#[test]
fn config_file_on_disk_drives_the_run() {
    let project = Project::new();
    fs::write(
        project.root().join("pack.toml"),
        r#"
        staging = "dist-pack"
        interactive = false

        [frontend]
        command = ["sh", "-c", "mkdir -p dist && echo hi > dist/index.html"]
        name = "ui"
        "#,
    )
    .unwrap();

    let config = packager::config::load_config(&project.root().join("pack.toml")).unwrap();
    let packager = packager::Packager::new(project.root(), config, Platform::Linux).unwrap();
    let report = packager.run().unwrap();

    assert_eq!(report.staging, packager.root().join("dist-pack"));
    assert_eq!(tree(&report.staging), vec!["main", "ui/", "ui/index.html"]);
}

#[test]
fn project_root_is_made_absolute_without_resolving_links() {
    let project = Project::new();
    let links = tempfile::tempdir().unwrap();
    let link = links.path().join("linked-project");
    std::os::unix::fs::symlink(project.root(), &link).unwrap();

    let packager = packager::Packager::new(&link, project.config.clone(), Platform::Linux).unwrap();
    assert_eq!(packager.root(), link.as_path());

    let report = packager.run().unwrap();
    assert_eq!(report.backend, link.join("pack/main"));
    assert!(report.frontend.starts_with(&link));
    assert!(project.staging().join("front/index.html").is_file());
}

#[test]
fn missing_project_root_is_reported() {
    let project = Project::new();
    let missing = project.root().join("not-a-project");

    let err = packager::Packager::new(&missing, project.config.clone(), Platform::Linux)
        .err()
        .unwrap();
    match err {
        PackError::Filesystem { op, path, .. } => {
            assert_eq!(op, "resolve");
            assert_eq!(path, missing);
        }
        other => panic!("unexpected error: {other}"),
    }
}
