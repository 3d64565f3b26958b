//! Command line behavior of the `daprbundle` binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn daprbundle() -> Command {
    let mut cmd = Command::cargo_bin("daprbundle").unwrap();
    cmd.env_remove("GITHUB_TOKEN").env_remove("GITHUB_API_URL");
    cmd
}

#[test]
fn help_lists_every_flag() {
    daprbundle()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--runtime_os")
                .and(predicate::str::contains("--runtime_arch"))
                .and(predicate::str::contains("--runtime_ver"))
                .and(predicate::str::contains("--dashboard_ver"))
                .and(predicate::str::contains("--cli_ver"))
                .and(predicate::str::contains("--archive_dir")),
        );
}

#[test]
fn target_os_is_required() {
    daprbundle()
        .args(["--runtime_arch", "amd64"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--runtime_os"));
}

#[test]
fn unknown_arch_is_rejected() {
    daprbundle()
        .args(["--runtime_os", "linux", "--runtime_arch", "mips"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn invalid_download_host_exits_non_zero() {
    let tmp = tempfile::tempdir().unwrap();
    daprbundle()
        .current_dir(tmp.path())
        .args([
            "--runtime_os",
            "darwin",
            "--runtime_arch",
            "arm64",
            "--download_host",
            "not a url",
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("--download_host"));
}

#[test]
fn working_directory_is_never_an_output_directory() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("keep.txt"), b"keep").unwrap();
    daprbundle()
        .current_dir(tmp.path())
        .args([
            "--runtime_os",
            "linux",
            "--runtime_arch",
            "amd64",
            "--archive_dir",
            ".",
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("working directory"));
    assert!(tmp.path().join("keep.txt").is_file());
}

/// Pinned versions against a refused connection: every download fails,
/// yet the archive is produced.
fn unreachable_host_run(strict: bool) -> assert_cmd::assert::Assert {
    let tmp = tempfile::tempdir().unwrap();
    let mut cmd = daprbundle();
    cmd.current_dir(tmp.path()).args([
        "--runtime_os",
        "darwin",
        "--runtime_arch",
        "arm64",
        "--runtime_ver",
        "1.6.0",
        "--dashboard_ver",
        "0.9.0",
        "--cli_ver",
        "1.6.0",
        "--download_host",
        "http://127.0.0.1:9",
        "--http_timeout",
        "5",
    ]);
    if strict {
        cmd.arg("--strict");
    }
    let assert = cmd.assert();
    assert!(tmp.path().join("archive/daprbundle_darwin_arm64.tar.gz").is_file());
    assert!(tmp.path().join("daprbundle/details.json").is_file());
    assert
}

#[test]
fn failed_downloads_are_reported_without_failing() {
    unreachable_host_run(false)
        .success()
        .stdout(predicate::str::contains("4 of 4 downloads failed"));
}

#[test]
fn strict_mode_fails_incomplete_bundles() {
    unreachable_host_run(true).code(2);
}
