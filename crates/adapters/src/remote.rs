// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command execution on the device over SSH.

use crate::subprocess::{run_with_timeout, REMOTE_READ_TIMEOUT};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

/// Result of a remote command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteOutput {
    pub stdout: String,
    pub exit_code: i32,
}

#[derive(Debug, Error)]
pub enum RemoteExecError {
    #[error("ssh to {host}:{port} failed: {message}")]
    Failed { host: String, port: u16, message: String },
}

/// Runs one command on a remote host.
#[async_trait]
pub trait RemoteExec: Clone + Send + Sync + 'static {
    async fn exec(&self, host: &str, port: u16, command: &str)
        -> Result<RemoteOutput, RemoteExecError>;
}

/// Remote execution through the system `ssh` client, authenticating as root
/// with whatever keys or agent the operator has configured.
#[derive(Clone, Debug)]
pub struct SshExec {
    user: String,
    timeout: Duration,
}

impl Default for SshExec {
    fn default() -> Self {
        Self { user: "root".to_string(), timeout: REMOTE_READ_TIMEOUT }
    }
}

impl SshExec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn command(&self, host: &str, port: u16, command: &str) -> Command {
        let mut cmd = Command::new("ssh");
        cmd.arg("-p")
            .arg(port.to_string())
            .args(["-o", "LogLevel=ERROR"])
            .args(["-o", "StrictHostKeyChecking=no"])
            .args(["-o", "UserKnownHostsFile=/dev/null"])
            .args(["-o", "BatchMode=yes"])
            .arg(format!("{}@{host}", self.user))
            .arg(command);
        cmd
    }
}

#[async_trait]
impl RemoteExec for SshExec {
    async fn exec(
        &self,
        host: &str,
        port: u16,
        command: &str,
    ) -> Result<RemoteOutput, RemoteExecError> {
        tracing::debug!(host, port, command, "remote exec");
        let output = run_with_timeout(self.command(host, port, command), self.timeout, "ssh")
            .await
            .map_err(|message| RemoteExecError::Failed { host: host.to_string(), port, message })?;
        let exit_code = output.status.code().unwrap_or(-1);
        if exit_code != 0 {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::debug!(host, exit_code, stderr = %stderr.trim(), "remote command failed");
        }
        Ok(RemoteOutput { stdout: String::from_utf8_lossy(&output.stdout).into_owned(), exit_code })
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeRemoteExec, RemoteCall};

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{RemoteExec, RemoteExecError, RemoteOutput};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;

    /// Recorded remote command
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RemoteCall {
        pub host: String,
        pub port: u16,
        pub command: String,
    }

    #[derive(Default)]
    struct FakeRemoteState {
        responses: HashMap<String, RemoteOutput>,
        unreachable: bool,
        calls: Vec<RemoteCall>,
    }

    /// Scripted remote executor. Unscripted commands exit 1 with no output.
    #[derive(Clone, Default)]
    pub struct FakeRemoteExec {
        inner: Arc<Mutex<FakeRemoteState>>,
    }

    impl FakeRemoteExec {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, command: &str, stdout: &str, exit_code: i32) -> Self {
            self.inner.lock().responses.insert(
                command.to_string(),
                RemoteOutput { stdout: stdout.to_string(), exit_code },
            );
            self
        }

        /// Fail every call at the transport level.
        pub fn unreachable(self) -> Self {
            self.inner.lock().unreachable = true;
            self
        }

        pub fn calls(&self) -> Vec<RemoteCall> {
            self.inner.lock().calls.clone()
        }
    }

    #[async_trait]
    impl RemoteExec for FakeRemoteExec {
        async fn exec(
            &self,
            host: &str,
            port: u16,
            command: &str,
        ) -> Result<RemoteOutput, RemoteExecError> {
            let mut state = self.inner.lock();
            state.calls.push(RemoteCall {
                host: host.to_string(),
                port,
                command: command.to_string(),
            });
            if state.unreachable {
                return Err(RemoteExecError::Failed {
                    host: host.to_string(),
                    port,
                    message: "connection refused".to_string(),
                });
            }
            Ok(state
                .responses
                .get(command)
                .cloned()
                .unwrap_or(RemoteOutput { stdout: String::new(), exit_code: 1 }))
        }
    }
}

#[cfg(test)]
#[path = "remote_tests.rs"]
mod tests;
