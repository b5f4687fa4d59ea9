//! Integration tests for the command line interface

use std::path::Path;
use std::process::Command;

fn run_command(dir: &Path, args: &[&str]) -> (String, String, i32) {
    // Tests must not depend on a user's config.toml.
    let config = dir.join("config.toml");
    std::fs::write(&config, "").expect("Failed to write config");

    let output = Command::new(env!("CARGO_BIN_EXE_sheetcalc"))
        .current_dir(dir)
        .arg("--config")
        .arg(&config)
        .args(args)
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

#[test]
fn test_single_cell_value() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_command(
        dir.path(),
        &["--size", "3x3", "-s", "A0=5", "-s", "A1=10", "-s", "A2==A0+A1", "-c", "A2"],
    );
    assert_eq!(stdout.trim(), "15.0");
    assert_eq!(code, 0);
}

#[test]
fn test_error_cell_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_command(dir.path(), &["--size", "2x2", "-s", "A0==Z1", "-c", "A0"]);
    assert_eq!(stdout.trim(), "ERR_FORM!");
    assert_eq!(code, 1);

    let (stdout, _, code) = run_command(
        dir.path(),
        &["--size", "2x2", "-s", "A0==A1", "-s", "A1==A0", "-c", "A1"],
    );
    assert_eq!(stdout.trim(), "ERR_CYCLE!");
    assert_eq!(code, 1);
}

#[test]
fn test_table_output() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) =
        run_command(dir.path(), &["--size", "2x2", "-s", "A0=1", "-s", "B1==A0/4"]);
    assert_eq!(stdout, "\tA\tB\n0\t1.0\t\n1\t\t0.25\n");
    assert_eq!(code, 0);
}

#[test]
fn test_depth_output() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_command(
        dir.path(),
        &["--size", "2x2", "-d", "-s", "A0==A1", "-s", "A1==A0", "-s", "B0==B1*2"],
    );
    assert_eq!(stdout, "\tA\tB\n0\t*\t1\n1\t*\t0\n");
    assert_eq!(code, 0);
}

#[test]
fn test_save_then_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_command(
        dir.path(),
        &["sheet.csv", "--size", "2x3", "-s", "A0=2", "-s", "B2==A0*3", "-w"],
    );
    assert_eq!(code, 0, "stderr: {}", stderr);
    let content = std::fs::read_to_string(dir.path().join("sheet.csv")).unwrap();
    assert_eq!(content, "2,3\n2,,\n,,=A0*3\n");

    let (stdout, _, code) = run_command(dir.path(), &["sheet.csv", "-c", "B2"]);
    assert_eq!(stdout.trim(), "6.0");
    assert_eq!(code, 0);
}

#[test]
fn test_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_command(
        dir.path(),
        &["--size", "1x2", "-s", "A1=hello, world", "-o", "out.csv"],
    );
    assert_eq!(code, 0);
    let content = std::fs::read_to_string(dir.path().join("out.csv")).unwrap();
    assert_eq!(content, "1,2\n,\"hello, world\"\n");
}

#[test]
fn test_save_without_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_command(dir.path(), &["--size", "2x2", "-w"]);
    assert!(stderr.contains("Error:"));
    assert_eq!(code, 1);
}

#[test]
fn test_bad_file_reports_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("bad.csv"), "0,3\n").unwrap();
    let (_, stderr, code) = run_command(dir.path(), &["bad.csv"]);
    assert!(stderr.contains("Failed to open bad.csv"));
    assert_eq!(code, 1);
}

#[test]
fn test_unknown_option() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_command(dir.path(), &["--frobnicate"]);
    assert!(stderr.contains("Unknown option: --frobnicate"));
    assert_eq!(code, 1);
}
