// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request-scoped parameters of one sync run.

use crate::ignore::IgnorePatterns;
use crate::options::PushOptions;
use std::path::{Path, PathBuf};

/// SSH transport to the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transport {
    pub user: String,
    pub host: String,
    pub port: u16,
    pub verbose: bool,
}

impl Transport {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self { user: "root".to_string(), host: host.into(), port, verbose: false }
    }

    /// Remote shell command handed to rsync via `--rsh`.
    pub fn ssh_command(&self) -> String {
        let verbose = if self.verbose { "-vv " } else { "" };
        format!(
            "ssh {verbose}-p {} -o LogLevel=ERROR -o StrictHostKeyChecking=no -o UserKnownHostsFile=/dev/null",
            self.port
        )
    }
}

/// Everything the sync flow needs, built at the start of a run and
/// dropped at the end. Never shared between runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSession {
    pub source: PathBuf,
    /// Destination inside the container.
    pub destination: String,
    pub patterns: IgnorePatterns,
    pub transport: Transport,
    pub progress: bool,
    pub verbose: bool,
    pub before: Option<String>,
    pub after: Option<String>,
}

impl SyncSession {
    /// Build the session, translating `<source>/.gitignore` unless skipped.
    pub fn from_options(options: &PushOptions) -> std::io::Result<Self> {
        let mut patterns = if options.skip_gitignore {
            IgnorePatterns::default()
        } else {
            IgnorePatterns::translate(&options.source.join(".gitignore"))?
        };
        patterns.add_excludes(&options.ignore);

        let mut transport = Transport::new(options.device.clone(), options.ssh_port);
        transport.verbose = options.verbose;

        Ok(Self {
            source: options.source.clone(),
            destination: options.destination.clone(),
            patterns,
            transport,
            progress: options.progress,
            verbose: options.verbose,
            before: options.before.clone(),
            after: options.after.clone(),
        })
    }

    /// Host path of the in-container destination, given the container's writable layer.
    pub fn host_destination(&self, root_dir: &str) -> String {
        let relative = self.destination.trim_start_matches('/');
        Path::new(root_dir).join(relative).to_string_lossy().into_owned()
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
