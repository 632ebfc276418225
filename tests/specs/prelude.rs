// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fluent helpers for running `lp` and asserting on its output.

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Address in TEST-NET-1; never routed.
pub const DEVICE: &str = "192.0.2.10";

pub struct CliBuilder {
    cmd: Command,
}

/// `lp` with a clean environment for the variables it reads.
pub fn cli() -> CliBuilder {
    let mut cmd = Command::cargo_bin("lp").unwrap();
    for var in ["LP_LOG", "LP_DOCKER_PORT", "LP_SSH_PORT", "LP_DOCKER_TIMEOUT_SECS", "COLOR"] {
        cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1");
    CliBuilder { cmd }
}

impl CliBuilder {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn pwd(mut self, dir: &Path) -> Self {
        self.cmd.current_dir(dir);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn passes(mut self) -> RunAssert {
        let output = self.cmd.output().unwrap();
        let run = RunAssert::from(output);
        assert!(run.success, "expected success, got {:?}\nstderr:\n{}", run.code, run.stderr);
        run
    }

    pub fn fails(mut self) -> RunAssert {
        let output = self.cmd.output().unwrap();
        let run = RunAssert::from(output);
        assert!(!run.success, "expected failure\nstdout:\n{}", run.stdout);
        run
    }
}

pub struct RunAssert {
    success: bool,
    code: Option<i32>,
    stdout: String,
    stderr: String,
}

impl From<std::process::Output> for RunAssert {
    fn from(output: std::process::Output) -> Self {
        Self {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl RunAssert {
    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout.contains(needle), "stdout missing {needle:?}:\n{}", self.stdout);
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr.contains(needle), "stderr missing {needle:?}:\n{}", self.stderr);
        self
    }

    pub fn stderr_lacks(self, needle: &str) -> Self {
        assert!(!self.stderr.contains(needle), "stderr has {needle:?}:\n{}", self.stderr);
        self
    }

    pub fn code(self, expected: i32) -> Self {
        assert_eq!(self.code, Some(expected), "stderr:\n{}", self.stderr);
        self
    }
}

/// Scratch project directory.
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self { dir: tempfile::tempdir().unwrap() }
    }

    /// Project with a Dockerfile and package.json.
    pub fn node() -> Self {
        let project = Self::empty();
        project.file("Dockerfile", "FROM node:20-alpine\nCOPY . /usr/src/app\nCMD [\"npm\", \"start\"]\n");
        project.file("package.json", "{\"name\": \"app\"}\n");
        project
    }

    pub fn file(&self, rel: &str, contents: &str) -> &Self {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
        self
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// `lp` running inside the project directory.
    pub fn lp(&self) -> CliBuilder {
        cli().pwd(self.path())
    }
}
