//! Shared fixtures and assertions for the aeolus CLI specs.

#![allow(dead_code)]

use assert_cmd::assert::Assert;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const HELLO_WINDFILE: &str = r#"apiVersion: v0.0.1
metadata:
  name: hello
  description: says hello
  author: Test Author
jobs:
  hello:
    script: echo hi
"#;

pub const SHARED_ACTIONS: &str = r#"apiVersion: v0.0.1
metadata:
  name: shared
  description: shared steps
  author: Test Author
steps:
  compile:
    script: make
  report:
    script: echo "${WORKDIR}/report.xml"
"#;

pub const EXTERNAL_WINDFILE: &str = r#"apiVersion: v0.0.1
metadata:
  name: external
  description: uses shared steps
  author: Test Author
jobs:
  shared:
    use: actions/shared.yaml
  done:
    script: echo done
"#;

/// Temporary working directory with an isolated config home
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, path: &str) -> PathBuf {
        self.dir.path().join(path)
    }

    /// Write `content` to `path`, creating parent directories
    pub fn file(&self, path: &str, content: &str) -> &Self {
        let full = self.join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full, content).unwrap();
        self
    }

    /// Write an executable shell script
    #[cfg(unix)]
    pub fn script(&self, path: &str, content: &str) -> &Self {
        use std::os::unix::fs::PermissionsExt;
        self.file(path, content);
        std::fs::set_permissions(self.join(path), std::fs::Permissions::from_mode(0o755))
            .unwrap();
        self
    }

    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.join(path)).unwrap()
    }

    pub fn aeolus(&self) -> Cli {
        let mut cmd = Command::cargo_bin("aeolus").unwrap();
        cmd.current_dir(self.path())
            .env("XDG_CONFIG_HOME", self.join(".config"))
            .env_remove("RUST_LOG")
            .env_remove("BAMBOO_GENERATOR_IMAGE")
            .env_remove("BAMBOO_GENERATOR_JAR");
        Cli { cmd }
    }
}

pub struct Cli {
    cmd: Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn passes(mut self) -> Run {
        Run {
            assert: self.cmd.assert().success(),
        }
    }

    /// clap reports usage errors with exit code 2
    pub fn fails_with_usage(mut self) -> Run {
        Run {
            assert: self.cmd.assert().failure().code(2),
        }
    }

    pub fn fails(mut self) -> Run {
        Run {
            assert: self.cmd.assert().failure().code(1),
        }
    }
}

pub struct Run {
    assert: Assert,
}

impl Run {
    pub fn stdout_has(self, expected: &str) -> Self {
        Self {
            assert: self.assert.stdout(predicate::str::contains(expected)),
        }
    }

    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        Self {
            assert: self
                .assert
                .stdout(predicate::str::contains(unexpected).not()),
        }
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        Self {
            assert: self.assert.stderr(predicate::str::contains(expected)),
        }
    }

    /// Exact stdout comparison with a readable diff on mismatch
    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout(), expected);
        self
    }

    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.assert.get_output().stdout).into_owned()
    }
}
