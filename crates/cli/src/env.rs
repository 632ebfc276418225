// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI.
//!
//! `LP_DOCKER_PORT` and `LP_SSH_PORT` are read by clap as flag fallbacks.

use std::time::Duration;

/// Default container runtime API deadline.
pub const DEFAULT_DOCKER_TIMEOUT: Duration = Duration::from_secs(120);

/// Per-request runtime API deadline, `LP_DOCKER_TIMEOUT_SECS` (default 120s).
pub fn docker_timeout() -> Duration {
    std::env::var("LP_DOCKER_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_DOCKER_TIMEOUT)
}

/// Tracing filter directives from `LP_LOG`.
pub fn log_filter() -> Option<String> {
    std::env::var("LP_LOG").ok().filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
