// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shell syntax checking with `bash -n`

use aeolus_core::{CheckError, CheckOutcome, SyntaxChecker};
use std::io::Write;
use std::process::{Command, Stdio};

/// Parses scripts with `bash -n`, which reads without executing
#[derive(Debug, Clone)]
pub struct BashSyntaxChecker {
    bash: String,
}

impl BashSyntaxChecker {
    pub fn new() -> Self {
        Self {
            bash: "bash".to_string(),
        }
    }

    pub fn with_bash(mut self, bash: impl Into<String>) -> Self {
        self.bash = bash.into();
        self
    }
}

impl Default for BashSyntaxChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxChecker for BashSyntaxChecker {
    fn check(&self, content: &str) -> Result<CheckOutcome, CheckError> {
        let mut child = Command::new(&self.bash)
            .arg("-n")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        // stdin is dropped at the end of this block so bash sees EOF
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(content.as_bytes())?;
        }
        let output = child.wait_with_output()?;

        let diagnostics = String::from_utf8_lossy(&output.stderr).trim().to_string();
        tracing::debug!(passed = output.status.success(), "bash syntax check");
        Ok(CheckOutcome {
            passed: output.status.success(),
            diagnostics,
        })
    }
}

#[cfg(test)]
#[path = "checker_tests.rs"]
mod tests;
