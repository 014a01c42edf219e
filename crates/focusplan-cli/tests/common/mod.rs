//! Shared helpers for CLI end-to-end tests.
//!
//! Every invocation runs against a throwaway HOME so the user's real
//! configuration is never read or written.

#![allow(dead_code)]

use std::io::Write;
use std::process::{Command, Stdio};

use tempfile::TempDir;

pub struct Cli {
    home: TempDir,
}

impl Cli {
    pub fn new() -> Self {
        Self {
            home: TempDir::new().expect("Failed to create temp home"),
        }
    }

    pub fn home(&self) -> &std::path::Path {
        self.home.path()
    }

    /// Run a CLI command, optionally feeding stdin, and return (stdout, stderr, code).
    pub fn run(&self, args: &[&str], stdin: Option<&str>) -> (String, String, i32) {
        let mut child = Command::new(env!("CARGO_BIN_EXE_focusplan"))
            .args(args)
            .env("HOME", self.home.path())
            .env_remove("FOCUSPLAN_ENV")
            .env_remove("FOCUSPLAN_LOG")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to execute CLI command");

        {
            let mut pipe = child.stdin.take().expect("stdin is piped");
            // the process may exit before reading, e.g. on argument errors
            if let Some(input) = stdin {
                let _ = pipe.write_all(input.as_bytes());
            }
        }

        let output = child.wait_with_output().expect("Failed to wait for CLI");
        (
            String::from_utf8_lossy(&output.stdout).to_string(),
            String::from_utf8_lossy(&output.stderr).to_string(),
            output.status.code().unwrap_or(-1),
        )
    }

    /// Run and assert success. Returns stdout.
    pub fn run_success(&self, args: &[&str], stdin: Option<&str>) -> String {
        let (stdout, stderr, code) = self.run(args, stdin);
        assert_eq!(
            code, 0,
            "Command failed: {:?}\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
        stdout
    }

    /// Run and assert failure. Returns stderr.
    pub fn run_failure(&self, args: &[&str], stdin: Option<&str>) -> String {
        let (stdout, stderr, code) = self.run(args, stdin);
        assert_ne!(
            code, 0,
            "Command should have failed: {:?}\nstdout: {}",
            args, stdout
        );
        stderr
    }
}

/// Parse JSON output.
pub fn parse_json(output: &str) -> serde_json::Value {
    serde_json::from_str(output)
        .unwrap_or_else(|e| panic!("Failed to parse JSON: {e}\nOutput: {output}"))
}

/// Assert that output contains a substring.
pub fn assert_contains(output: &str, expected: &str) {
    assert!(
        output.contains(expected),
        "Expected output to contain '{expected}'\nActual output:\n{output}"
    );
}
