/*
 * cli_integration.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Integration tests for the confmerge binary.
 */

//! These tests run the compiled binary and check files, stdout and exit codes.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Run confmerge in `dir` with `args`, feeding `stdin`.
fn run(dir: &Path, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_confmerge"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start confmerge");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("Failed to write stdin");
    child.wait_with_output().expect("Failed to wait for confmerge")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_render_from_csv() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("router.txt"),
        "hostname <HOSTNAME>\nip address <IP> <MASK>\n",
    )
    .unwrap();
    fs::write(
        temp.path().join("routers.csv"),
        "<HOSTNAME>,<IP>,<MASK>\nR1,10.0.0.1,255.255.255.0\nR2,,255.255.255.0\n",
    )
    .unwrap();

    let output = run(temp.path(), &["router.txt", "-i", "routers.csv"], "");

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Successfully exported 2 configuration files."));
    assert_eq!(
        fs::read_to_string(temp.path().join("configs/R2.txt")).unwrap(),
        "hostname R2\n"
    );
}

#[test]
fn test_single_mode_leaves_unfilled_placeholders() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("router.txt"),
        "hostname <HOSTNAME>\nip address <IP> <MASK>\n",
    )
    .unwrap();
    fs::write(
        temp.path().join("one.csv"),
        "<IP>,<MASK>\n10.0.0.1,255.255.255.0\n",
    )
    .unwrap();

    let output = run(temp.path(), &["router.txt", "-i", "one.csv", "--single"], "");

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Successfully exported 1 configuration files."));
    assert_eq!(
        fs::read_to_string(temp.path().join("configs/router-merged.txt")).unwrap(),
        "hostname <HOSTNAME>\nip address 10.0.0.1 255.255.255.0\n"
    );
}

#[test]
fn test_mismatch_exits_non_zero_without_output() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("t.txt"), "<HOSTNAME> <A> <B>\n").unwrap();
    fs::write(temp.path().join("d.csv"), "<HOSTNAME>,<A>,<C>\nR1,a,c\n").unwrap();

    let output = run(temp.path(), &["t.txt", "-i", "d.csv"], "");

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("<B> only exists in t.txt"), "stderr: {err}");
    assert!(err.contains("<C> only exists in d.csv"), "stderr: {err}");
    assert!(!temp.path().join("configs").exists());
}

#[test]
fn test_missing_template_propagates_os_error() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("d.csv"), "<HOSTNAME>\nR1\n").unwrap();

    let output = run(temp.path(), &["missing.txt", "-i", "d.csv"], "");

    assert!(!output.status.success());
    assert_ne!(output.status.code(), Some(0));
    assert!(stderr(&output).contains("missing.txt"));
}

#[test]
fn test_header_generation() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("router.txt"),
        "hostname <HOSTNAME>\nip address <IP> <MASK>\nrouter ospf <AREA>\n",
    )
    .unwrap();

    let output = run(temp.path(), &["router.txt", "-o", "vars.csv"], "");

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        fs::read_to_string(temp.path().join("vars.csv")).unwrap(),
        "<HOSTNAME>,<AREA>,<IP>,<MASK>\n"
    );
}

#[test]
fn test_header_overwrite_declined() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("router.txt"), "hostname <HOSTNAME>\n").unwrap();
    fs::write(temp.path().join("vars.csv"), "keep\n").unwrap();

    let output = run(temp.path(), &["router.txt", "-o", "vars.csv"], "n\n");

    assert_eq!(output.status.code(), Some(3));
    assert_eq!(
        fs::read_to_string(temp.path().join("vars.csv")).unwrap(),
        "keep\n"
    );
}

#[test]
fn test_header_overwrite_with_yes_flag() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("router.txt"), "hostname <HOSTNAME>\n").unwrap();
    fs::write(temp.path().join("vars.csv"), "old\n").unwrap();

    let output = run(temp.path(), &["router.txt", "-o", "vars.csv", "--yes"], "");

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        fs::read_to_string(temp.path().join("vars.csv")).unwrap(),
        "<HOSTNAME>\n"
    );
}

#[test]
fn test_invalid_key_name_fails_before_io() {
    let temp = TempDir::new().unwrap();

    // Neither file exists; the key error is reported instead of an I/O error.
    let output = run(temp.path(), &["t.txt", "-i", "d.csv", "--key", "<HOST>"], "");

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("invalid unique key name"));
}
