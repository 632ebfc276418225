// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed push options and their precedence merge.
//!
//! Precedence is explicit flag, then saved record, then built-in default.
//! The merge happens once; the result is passed by value into the engine.

use crate::config::SyncConfig;
use crate::triggers::TriggerSet;
use crate::validate::{validate_env, AppName, ValidationError};
use std::path::PathBuf;

pub const DEFAULT_DESTINATION: &str = "/usr/src/app";
pub const DEFAULT_APP_NAME: &str = "local-app";
pub const DEFAULT_IGNORE: &[&str] = &[".git", "node_modules/"];
pub const DEFAULT_DOCKER_PORT: u16 = 2375;
pub const DEFAULT_SSH_PORT: u16 = 22222;

/// Always tracked in addition to user-declared trigger files.
pub const IMPLICIT_TRIGGERS: &[&str] = &["Dockerfile", "package.json"];

/// Values supplied on the command line or via environment overrides.
/// `None` and `false` mean "not given".
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub device: Option<String>,
    pub source: Option<PathBuf>,
    pub destination: Option<String>,
    pub ignore: Option<Vec<String>>,
    pub skip_gitignore: bool,
    pub before: Option<String>,
    pub after: Option<String>,
    pub progress: bool,
    pub verbose: bool,
    pub skip_logs: bool,
    pub skip_restart: bool,
    pub app_name: Option<String>,
    pub build_triggers: Option<Vec<String>>,
    pub force_build: bool,
    pub env: Option<Vec<String>>,
    pub docker_port: Option<u16>,
    pub ssh_port: Option<u16>,
}

/// Fully resolved options for one push.
#[derive(Debug, Clone, PartialEq)]
pub struct PushOptions {
    /// Project directory on the local machine.
    pub source: PathBuf,
    /// Device address (host name or IP).
    pub device: String,
    /// Path inside the container that mirrors `source`.
    pub destination: String,
    pub ignore: Vec<String>,
    pub skip_gitignore: bool,
    pub before: Option<String>,
    pub after: Option<String>,
    pub progress: bool,
    pub verbose: bool,
    pub skip_logs: bool,
    pub skip_restart: bool,
    pub app_name: AppName,
    /// User-declared trigger files: the command-line list if given, else the saved list.
    pub build_triggers: Vec<String>,
    /// True when `build_triggers` came from the command line on this run.
    pub triggers_overridden: bool,
    /// Trigger hashes from the last successful rebuild decision.
    pub saved_triggers: TriggerSet,
    pub force_build: bool,
    pub env: Vec<String>,
    pub docker_port: u16,
    pub ssh_port: u16,
}

impl PushOptions {
    /// Merge command-line values over the saved record.
    pub fn resolve(cli: CliOverrides, saved: &SyncConfig) -> Result<Self, ValidationError> {
        let source = cli.source.ok_or(ValidationError::MissingOption("source"))?;
        let device = cli
            .device
            .filter(|d| !d.trim().is_empty())
            .ok_or(ValidationError::MissingOption("device"))?;

        let app_name = match cli.app_name.as_deref().or(saved.device.app_name.as_deref()) {
            Some(name) => AppName::parse(name)?,
            None => AppName::default(),
        };

        let env = cli.env.or_else(|| saved.device.environment.clone()).unwrap_or_default();
        validate_env(&env)?;

        let triggers_overridden = cli.build_triggers.is_some();
        let build_triggers =
            cli.build_triggers.unwrap_or_else(|| saved.device.build_triggers.paths());

        Ok(Self {
            source,
            device,
            destination: cli
                .destination
                .or_else(|| saved.destination.clone())
                .unwrap_or_else(|| DEFAULT_DESTINATION.to_string()),
            ignore: cli
                .ignore
                .or_else(|| saved.ignore.clone())
                .unwrap_or_else(|| DEFAULT_IGNORE.iter().map(|s| s.to_string()).collect()),
            skip_gitignore: cli.skip_gitignore,
            before: cli.before.or_else(|| saved.before.clone()),
            after: cli.after.or_else(|| saved.after.clone()),
            progress: cli.progress,
            verbose: cli.verbose,
            skip_logs: cli.skip_logs,
            skip_restart: cli.skip_restart,
            app_name,
            build_triggers,
            triggers_overridden,
            saved_triggers: saved.device.build_triggers.clone(),
            force_build: cli.force_build,
            env,
            docker_port: cli.docker_port.unwrap_or(DEFAULT_DOCKER_PORT),
            ssh_port: cli.ssh_port.unwrap_or(DEFAULT_SSH_PORT),
        })
    }

    /// Write the sync-path fields back into the record.
    pub fn record_sync_settings(&self, config: &mut SyncConfig) {
        config.destination = Some(self.destination.clone());
        config.ignore = Some(self.ignore.clone());
        config.before = self.before.clone();
        config.after = self.after.clone();
    }

    /// Write the build-path fields back into the record.
    pub fn record_build_settings(&self, config: &mut SyncConfig, triggers: TriggerSet) {
        config.device.app_name = Some(self.app_name.to_string());
        config.device.build_triggers = triggers;
        config.device.environment = Some(self.env.clone());
    }
}

crate::builder! {
    pub struct PushOptionsBuilder => PushOptions {
        into {
            source: PathBuf = PathBuf::from("/project"),
            device: String = "192.168.1.10",
            destination: String = DEFAULT_DESTINATION,
        }
        set {
            ignore: Vec<String> = Vec::new(),
            skip_gitignore: bool = false,
            before: Option<String> = None,
            after: Option<String> = None,
            progress: bool = false,
            verbose: bool = false,
            skip_logs: bool = true,
            skip_restart: bool = false,
            app_name: AppName = AppName::default(),
            build_triggers: Vec<String> = Vec::new(),
            triggers_overridden: bool = false,
            saved_triggers: TriggerSet = TriggerSet::default(),
            force_build: bool = false,
            env: Vec<String> = Vec::new(),
            docker_port: u16 = DEFAULT_DOCKER_PORT,
            ssh_port: u16 = DEFAULT_SSH_PORT,
        }
    }
}

#[cfg(test)]
#[path = "options_tests.rs"]
mod tests;
