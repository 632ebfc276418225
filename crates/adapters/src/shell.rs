// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local shell command execution for hooks and the transfer tool.

use crate::subprocess::status_with_timeout;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("{0}")]
    Exec(String),
}

/// Runs a shell command line in a working directory, with the operator's
/// terminal attached. Returns the exit code.
#[async_trait]
pub trait ShellRunner: Clone + Send + Sync + 'static {
    async fn run(&self, command: &str, cwd: &Path, timeout: Duration) -> Result<i32, ShellError>;
}

/// `/bin/sh -c` on the local machine.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalShell;

impl LocalShell {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ShellRunner for LocalShell {
    async fn run(&self, command: &str, cwd: &Path, timeout: Duration) -> Result<i32, ShellError> {
        tracing::debug!(%command, cwd = %cwd.display(), "running shell command");
        let mut cmd = Command::new("/bin/sh");
        cmd.arg("-c").arg(command).current_dir(cwd);
        let status =
            status_with_timeout(cmd, timeout, "shell command").await.map_err(ShellError::Exec)?;
        // Killed by a signal
        Ok(status.code().unwrap_or(-1))
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeShell, ShellCall};

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{ShellError, ShellRunner};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use std::time::Duration;

    /// Recorded shell command
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ShellCall {
        pub command: String,
        pub cwd: PathBuf,
    }

    #[derive(Default)]
    struct FakeShellState {
        /// `(substring, exit code)` rules; first match wins.
        exit_codes: Vec<(String, i32)>,
        calls: Vec<ShellCall>,
    }

    /// Shell runner that records commands and exits 0 unless told otherwise.
    #[derive(Clone, Default)]
    pub struct FakeShell {
        inner: Arc<Mutex<FakeShellState>>,
    }

    impl FakeShell {
        pub fn new() -> Self {
            Self::default()
        }

        /// Commands containing `needle` exit with `code`.
        pub fn exit_with(self, needle: &str, code: i32) -> Self {
            self.inner.lock().exit_codes.push((needle.to_string(), code));
            self
        }

        pub fn calls(&self) -> Vec<ShellCall> {
            self.inner.lock().calls.clone()
        }

        pub fn commands(&self) -> Vec<String> {
            self.inner.lock().calls.iter().map(|c| c.command.clone()).collect()
        }
    }

    #[async_trait]
    impl ShellRunner for FakeShell {
        async fn run(
            &self,
            command: &str,
            cwd: &Path,
            _timeout: Duration,
        ) -> Result<i32, ShellError> {
            let mut state = self.inner.lock();
            state.calls.push(ShellCall { command: command.to_string(), cwd: cwd.to_path_buf() });
            let code = state
                .exit_codes
                .iter()
                .find(|(needle, _)| command.contains(needle.as_str()))
                .map(|(_, code)| *code)
                .unwrap_or(0);
            Ok(code)
        }
    }
}

#[cfg(test)]
#[path = "shell_tests.rs"]
mod tests;
