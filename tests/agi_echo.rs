//! Process-level tests of the `agi-echo` demo script.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

fn agi_echo_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_agi-echo"))
}

fn run_with_stdin(input: &str) -> Output {
    let mut child = Command::new(agi_echo_bin())
        .env_remove("AGI_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn agi-echo");
    child
        .stdin
        .take()
        .expect("stdin piped")
        .write_all(input.as_bytes())
        .expect("write stdin");
    child
        .wait_with_output()
        .expect("wait for agi-echo")
}

#[test]
fn malformed_startup_line_exits_nonzero_with_diagnostic() {
    let output = run_with_stdin("agi_request: echo\nagi_channel: SIP/1\ngarbage\n\n");

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty(), "no command may be sent");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("agi: fatal: malformed startup block"), "stderr: {stderr}");
    assert!(stderr.contains("line 3"), "stderr: {stderr}");
}

#[test]
fn truncated_startup_block_exits_nonzero() {
    let output = run_with_stdin("agi_request: echo\n");
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn desynced_reply_exits_nonzero() {
    let output = run_with_stdin("agi_request: echo\n\n520 Invalid command syntax\n");
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(output.stdout, b"ANSWER\n");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("protocol desync"), "stderr: {stderr}");
}

#[test]
fn well_formed_session_runs_to_completion() {
    let input = "agi_request: echo\nagi_channel: SIP/100-0001\n\n\
                 200 result=0\n200 result=1\n";
    let output = run_with_stdin(input);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "ANSWER\nVERBOSE \"agi-echo on SIP/100-0001\" 1\n"
    );
}
