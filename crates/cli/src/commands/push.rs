// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `lp push`: rebuild or sync the project into its container on the device.

use anyhow::{Context, Result};
use clap::Args;
use lp_adapters::{
    BollardRuntime, ConfigStore, ContainerRuntime, LocalShell, SshExec, TerminalProgress,
    YamlConfigStore,
};
use lp_core::{CliOverrides, PushOptions, ValidationError};
use lp_engine::{PushDeps, SyncOrchestrator};
use std::path::{Path, PathBuf};

use crate::color;
use crate::env;

#[derive(Args, Debug, Default)]
pub struct PushArgs {
    /// Device IP address or host name
    pub device: Option<String>,

    /// Root of the project directory to push
    #[arg(short, long, value_name = "PATH")]
    pub source: Option<PathBuf>,

    /// Destination path inside the container
    #[arg(short, long, value_name = "PATH")]
    pub destination: Option<String>,

    /// Comma-separated paths to leave out of the sync
    #[arg(short, long, value_name = "PATHS", value_delimiter = ',')]
    pub ignore: Option<Vec<String>>,

    /// Do not read include/exclude rules from .gitignore
    #[arg(long)]
    pub skip_gitignore: bool,

    /// Command to run locally before syncing
    #[arg(short, long, value_name = "COMMAND")]
    pub before: Option<String>,

    /// Command to run locally after syncing
    #[arg(short, long, value_name = "COMMAND")]
    pub after: Option<String>,

    /// Show transfer progress
    #[arg(short, long)]
    pub progress: bool,

    /// Verbose transfer and debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Do not stream container logs after pushing
    #[arg(short = 'l', long)]
    pub skip_logs: bool,

    /// Sync files without restarting the container
    #[arg(long)]
    pub skip_restart: bool,

    /// Application name: lowercase letters, digits and dashes
    #[arg(short = 'n', long, value_name = "NAME")]
    pub app_name: Option<String>,

    /// Comma-separated files that trigger a rebuild when changed
    #[arg(short = 'r', long, value_name = "FILES", value_delimiter = ',')]
    pub build_triggers: Option<Vec<String>>,

    /// Rebuild even if nothing changed
    #[arg(short, long)]
    pub force_build: bool,

    /// Environment variable for the container, as NAME=value (repeatable)
    #[arg(short, long = "env", value_name = "NAME=VALUE")]
    pub env: Vec<String>,

    /// Container runtime API port on the device
    #[arg(long, env = "LP_DOCKER_PORT", value_name = "PORT")]
    pub docker_port: Option<u16>,

    /// SSH port on the device
    #[arg(long, env = "LP_SSH_PORT", value_name = "PORT")]
    pub ssh_port: Option<u16>,
}

impl PushArgs {
    /// Command-line values with `source` already resolved against the working directory.
    pub fn into_overrides(self, source: Option<PathBuf>) -> CliOverrides {
        CliOverrides {
            device: self.device,
            source,
            destination: self.destination,
            ignore: self.ignore.map(trim_list),
            skip_gitignore: self.skip_gitignore,
            before: self.before,
            after: self.after,
            progress: self.progress,
            verbose: self.verbose,
            skip_logs: self.skip_logs,
            skip_restart: self.skip_restart,
            app_name: self.app_name,
            build_triggers: self.build_triggers.map(trim_list),
            force_build: self.force_build,
            env: (!self.env.is_empty()).then_some(self.env),
            docker_port: self.docker_port,
            ssh_port: self.ssh_port,
        }
    }
}

fn trim_list(items: Vec<String>) -> Vec<String> {
    items.into_iter().map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()
}

/// `--source` relative to `cwd`; without it, `cwd` if it holds a saved record.
pub fn resolve_source(
    flag: Option<&Path>,
    cwd: &Path,
    store: &impl ConfigStore,
) -> Result<PathBuf, ValidationError> {
    match flag {
        Some(path) => Ok(cwd.join(path)),
        None if store.exists(cwd) => Ok(cwd.to_path_buf()),
        None => Err(ValidationError::MissingOption("source")),
    }
}

pub async fn handle(args: PushArgs) -> Result<()> {
    let store = YamlConfigStore::new();
    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let source = resolve_source(args.source.as_deref(), &cwd, &store)?;
    let saved = store.load(&source)?;
    let options = PushOptions::resolve(args.into_overrides(Some(source)), &saved)?;

    let runtime =
        BollardRuntime::connect(&options.device, options.docker_port, env::docker_timeout())?;
    let mut orchestrator = SyncOrchestrator::new(PushDeps {
        runtime: runtime.clone(),
        remote: SshExec::new(),
        shell: LocalShell::new(),
        store,
    });
    let report = orchestrator.run(&options, &mut TerminalProgress::stdout()).await?;

    let verb = if report.decision.rebuild() { "Rebuilt" } else { "Synced" };
    println!(
        "{}",
        color::header(&format!("{verb} '{}' on {}", options.app_name, options.device))
    );

    if !options.skip_logs {
        follow_logs(&runtime, options.app_name.as_str()).await;
    }
    Ok(())
}

/// Stream container output until Ctrl-C. Failures are reported, not fatal.
async fn follow_logs(runtime: &impl ContainerRuntime, name: &str) {
    tracing::info!(container = name, "streaming logs, press Ctrl-C to stop");
    let mut out = std::io::stdout();
    tokio::select! {
        result = runtime.follow_logs(name, &mut out) => {
            if let Err(e) = result {
                tracing::warn!(container = name, error = %e, "log streaming stopped");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::debug!(container = name, "log streaming interrupted");
        }
    }
}

#[cfg(test)]
#[path = "push_tests.rs"]
mod tests;
