// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess execution with deadlines.
//!
//! Children are spawned with `kill_on_drop` so an expired deadline also
//! terminates the process.

use std::process::{ExitStatus, Output};
use std::time::Duration;
use tokio::process::Command;

/// Reading a metadata file over SSH.
pub const REMOTE_READ_TIMEOUT: Duration = Duration::from_secs(30);

/// `before`/`after` hook commands.
pub const HOOK_TIMEOUT: Duration = Duration::from_secs(600);

/// A full rsync of the project directory.
pub const TRANSFER_TIMEOUT: Duration = Duration::from_secs(1800);

/// Run a command to completion, capturing stdout and stderr.
pub async fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    label: &str,
) -> Result<Output, String> {
    cmd.kill_on_drop(true);
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(format!("{label}: failed to spawn: {e}")),
        Err(_) => Err(format!("{label}: timed out after {}s", timeout.as_secs())),
    }
}

/// Run a command with inherited stdio, returning only its exit status.
pub async fn status_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    label: &str,
) -> Result<ExitStatus, String> {
    cmd.kill_on_drop(true);
    let mut child = cmd.spawn().map_err(|e| format!("{label}: failed to spawn: {e}"))?;
    match tokio::time::timeout(timeout, child.wait()).await {
        Ok(Ok(status)) => Ok(status),
        Ok(Err(e)) => Err(format!("{label}: wait failed: {e}")),
        Err(_) => Err(format!("{label}: timed out after {}s", timeout.as_secs())),
    }
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
