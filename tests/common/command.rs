use crate::common::file::write_files;
use assert_cmd::Command;
use assert_fs::TempDir;
use fake::Fake;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use rstest::fixture;
use std::path::Path;

pub const COMMIT_DATE: &str = "2024-05-15T10:00:00+00:00";

#[fixture]
pub fn origin_dir() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");

    run_git_command(dir.path(), &["init", "-q"]).assert().success();
    run_git_command(dir.path(), &["config", "user.name", "Origin Maintainer"])
        .assert()
        .success();
    run_git_command(dir.path(), &["config", "user.email", "maintainer@example.com"])
        .assert()
        .success();
    run_git_command(dir.path(), &["config", "commit.gpgsign", "false"])
        .assert()
        .success();

    dir
}

#[fixture]
pub fn destination_dir() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    std::fs::create_dir_all(dir.path().join("library/io/reachu"))
        .expect("Failed to create destination root");
    dir
}

pub fn run_portcheck_command(origin: &Path, destination: Option<&Path>, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("portcheck").expect("Failed to find portcheck binary");
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("PORTCHECK_RULES");
    cmd.env_remove("PORTCHECK_DESTINATION");
    cmd.arg("--origin").arg(origin);
    if let Some(destination) = destination {
        cmd.arg("--destination").arg(destination);
    }
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn run_git_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new("git");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

/// Stage everything and commit as a random author at `date`
pub fn git_commit_at(dir: &Path, message: &str, date: &str) -> String {
    let name: String = Name().fake();
    let email: String = SafeEmail().fake();

    run_git_command(dir, &["add", "-A"]).assert().success();
    run_git_command(dir, &["commit", "-q", "--allow-empty", "-m", message])
        .env("GIT_AUTHOR_NAME", &name)
        .env("GIT_AUTHOR_EMAIL", &email)
        .env("GIT_AUTHOR_DATE", date)
        .env("GIT_COMMITTER_DATE", date)
        .assert()
        .success();

    head_commit_id(dir)
}

pub fn git_commit(dir: &Path, message: &str) -> String {
    git_commit_at(dir, message, COMMIT_DATE)
}

/// Write `files` into the origin and commit them
pub fn commit_files(dir: &Path, message: &str, files: &[(&str, &str)]) -> String {
    write_files(dir, files);
    git_commit(dir, message)
}

pub fn head_commit_id(dir: &Path) -> String {
    let output = run_git_command(dir, &["rev-parse", "HEAD"])
        .output()
        .expect("Failed to run git rev-parse");
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

pub fn json_output(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().expect("Failed to run portcheck");
    assert!(
        output.status.success(),
        "portcheck failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("portcheck did not print JSON")
}
