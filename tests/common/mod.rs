// Shared test helpers for integration tests.
// Used by cli_contract.rs and cli_flows.rs.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

pub fn binary_path() -> PathBuf {
    let path = PathBuf::from(env!("CARGO_BIN_EXE_koche"));
    assert!(path.exists(), "binary not found at {}", path.display());
    path
}

/// Runs the binary in `dir` with the given args.
/// Returns (stdout, stderr, exit_code).
pub fn run_koche(dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(binary_path())
        .args(args)
        .current_dir(dir)
        .env_remove("KOCHE_LOG")
        .output()
        .expect("failed to execute binary");
    decode(output)
}

/// Runs an installed hook script through `sh`, the way git would invoke it.
pub fn run_hook_script(dir: &Path, message_path: &Path) -> (String, String, i32) {
    let output = Command::new("sh")
        .arg(dir.join(".git/hooks/commit-msg"))
        .arg(message_path)
        .current_dir(dir)
        .env_remove("KOCHE_LOG")
        .output()
        .expect("failed to execute sh");
    decode(output)
}

fn decode(output: std::process::Output) -> (String, String, i32) {
    let stdout = String::from_utf8(output.stdout).expect("stdout not valid UTF-8");
    let stderr = String::from_utf8(output.stderr).expect("stderr not valid UTF-8");
    let exit_code = output.status.code().unwrap_or(-1);
    (stdout, stderr, exit_code)
}

/// A temp directory with a `.git/hooks` directory, as `git init` leaves it.
pub fn git_repo() -> TempDir {
    let dir = TempDir::new().expect("failed to create temp dir");
    std::fs::create_dir_all(dir.path().join(".git/hooks")).expect("failed to create .git/hooks");
    dir
}

/// Writes `text` as the commit message file and returns its path.
pub fn message_file(dir: &Path, text: &str) -> PathBuf {
    let path = dir.join("COMMIT_EDITMSG");
    std::fs::write(&path, text).expect("failed to write message file");
    path
}

/// Validates `text` as a commit message. Returns (stdout, exit_code).
pub fn validate(text: &str) -> (String, i32) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = message_file(dir.path(), text);
    let (stdout, _, code) = run_koche(dir.path(), &[path.to_str().unwrap()]);
    (stdout, code)
}

pub fn hook_path(dir: &Path) -> PathBuf {
    dir.join(".git/hooks/commit-msg")
}
