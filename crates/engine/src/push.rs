// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Push orchestration: decide, then rebuild or sync.
//!
//! ```text
//! Idle -> Deciding -> Building ----------------> Done
//!                  -> Syncing --(after stop)--> Recovering -> Done
//!                             ----------------------------> Done
//! ```

use crate::decision::BuildDecisionEngine;
use crate::error::PushError;
use crate::rootdir::RootDirResolver;
use crate::transfer::{remote_wrapper, TransferCommand};
use lp_adapters::runtime::STOP_GRACE;
use lp_adapters::subprocess::{HOOK_TIMEOUT, TRANSFER_TIMEOUT};
use lp_adapters::{BuildProgress, ConfigStore, ContainerRuntime, RemoteExec, ShellRunner};
use lp_core::{PushOptions, RebuildDecision, SyncSession, ValidationError};
use std::path::Path;
use std::time::Instant;

/// Adapters a push needs, constructed once per run.
pub struct PushDeps<R, X, S, C> {
    pub runtime: R,
    pub remote: X,
    pub shell: S,
    pub store: C,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushState {
    Idle,
    Deciding,
    Building,
    Syncing,
    Recovering,
    Done,
}

lp_core::simple_display! {
    PushState {
        Idle => "idle",
        Deciding => "deciding",
        Building => "building",
        Syncing => "syncing",
        Recovering => "recovering",
        Done => "done",
    }
}

/// Outcome of a successful push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushReport {
    pub decision: RebuildDecision,
    /// States visited, in order.
    pub states: Vec<PushState>,
}

/// Fail early when the project cannot be built on the device.
pub fn ensure_dockerfile(source: &Path) -> Result<(), ValidationError> {
    if source.join("Dockerfile").is_file() {
        return Ok(());
    }
    if source.join("Dockerfile.template").is_file() {
        return Err(ValidationError::DockerfileTemplate(source.to_path_buf()));
    }
    Err(ValidationError::MissingDockerfile(source.to_path_buf()))
}

pub struct SyncOrchestrator<R, X, S, C> {
    deps: PushDeps<R, X, S, C>,
    state: PushState,
    history: Vec<PushState>,
}

impl<R, X, S, C> SyncOrchestrator<R, X, S, C>
where
    R: ContainerRuntime,
    X: RemoteExec,
    S: ShellRunner,
    C: ConfigStore,
{
    pub fn new(deps: PushDeps<R, X, S, C>) -> Self {
        Self { deps, state: PushState::Idle, history: Vec::new() }
    }

    pub fn state(&self) -> PushState {
        self.state
    }

    /// States visited by the last run, including failed ones.
    pub fn history(&self) -> &[PushState] {
        &self.history
    }

    /// Run one push. Always ends in [`PushState::Done`].
    pub async fn run(
        &mut self,
        options: &PushOptions,
        progress: &mut dyn BuildProgress,
    ) -> Result<PushReport, PushError> {
        self.history.clear();
        self.enter(PushState::Idle);
        let start = Instant::now();
        let result = self.drive(options, progress).await;
        self.enter(PushState::Done);
        let elapsed_ms = start.elapsed().as_millis() as u64;
        match result {
            Ok(decision) => {
                tracing::info!(app = %options.app_name, %decision, elapsed_ms, "push complete");
                Ok(PushReport { decision, states: self.history.clone() })
            }
            Err(e) => {
                tracing::debug!(app = %options.app_name, error = %e, elapsed_ms, "push failed");
                Err(e)
            }
        }
    }

    fn enter(&mut self, state: PushState) {
        tracing::debug!(state = %state, previous = %self.state, "push state");
        self.state = state;
        self.history.push(state);
    }

    async fn drive(
        &mut self,
        options: &PushOptions,
        progress: &mut dyn BuildProgress,
    ) -> Result<RebuildDecision, PushError> {
        ensure_dockerfile(&options.source)?;

        self.enter(PushState::Deciding);
        let engine =
            BuildDecisionEngine::new(self.deps.runtime.clone(), self.deps.store.clone());
        let decision = engine.decide(options).await?;

        if decision.rebuild() {
            self.enter(PushState::Building);
            engine.record_triggers(options).await?;
            self.build(options, progress).await?;
        } else {
            self.enter(PushState::Syncing);
            self.sync(options).await?;
        }
        Ok(decision)
    }

    /// Replace the container with one built from the current sources.
    ///
    /// No rollback: a failure leaves the device without a running container.
    async fn build(
        &self,
        options: &PushOptions,
        progress: &mut dyn BuildProgress,
    ) -> Result<(), PushError> {
        let runtime = &self.deps.runtime;
        let name = options.app_name.as_str();

        tracing::info!(container = name, "stopping and removing previous container");
        let (cleared, old_image, cache_from) = tokio::join!(
            async {
                runtime.stop_container(name, STOP_GRACE).await?;
                runtime.remove_container(name).await
            },
            runtime.inspect_image(name),
            runtime.list_image_ids(),
        );
        cleared?;
        let old_image = old_image?;
        let cache_from = cache_from?;

        tracing::info!(image = name, "uploading build context and starting build");
        runtime.build_image(&options.source, name, &cache_from, progress).await?;
        let new_image = runtime.inspect_image(name).await?;
        if let (Some(old), Some(new)) = (&old_image, &new_image) {
            if old.id != new.id {
                tracing::info!(old = %old.id, new = %new.id, "cleaning up previous image");
                runtime.remove_image(&old.id).await?;
            }
        }

        tracing::info!(container = name, "creating container");
        runtime.create_container(name, &options.env).await?;
        tracing::info!(container = name, "starting container");
        runtime.start_container(name).await?;
        Ok(())
    }

    async fn sync(&mut self, options: &PushOptions) -> Result<(), PushError> {
        let session = SyncSession::from_options(options).map_err(PushError::Ignore)?;
        let name = options.app_name.as_str();

        self.record_sync_settings(options)?;
        if let Some(before) = &session.before {
            self.run_hook("before", before, &session.source).await?;
        }

        let mut stopped = false;
        let result = self.sync_steps(options, &session, &mut stopped).await;
        if let Err(e) = result {
            if stopped {
                self.enter(PushState::Recovering);
                self.restart_after_failure(name, &e).await;
            }
            return Err(e);
        }
        Ok(())
    }

    /// Every step after the `before` hook. Sets `stopped` just before the
    /// container is asked to stop.
    async fn sync_steps(
        &self,
        options: &PushOptions,
        session: &SyncSession,
        stopped: &mut bool,
    ) -> Result<(), PushError> {
        let runtime = &self.deps.runtime;
        let name = options.app_name.as_str();

        let resolver = RootDirResolver::new(runtime.clone(), self.deps.remote.clone());
        let location =
            resolver.resolve(name, Some((options.device.as_str(), options.ssh_port))).await?;

        let destination = session.host_destination(&location.path);
        let command = TransferCommand::new(session.transport.clone(), destination.clone())
            .rsync_path(remote_wrapper(&destination, location.runtime.flavor))
            .patterns(session.patterns.clone())
            .progress(session.progress)
            .verbose(session.verbose);
        let line = command.to_command_line();
        tracing::debug!(command = %line, "transfer command");

        let start = Instant::now();
        let code = self.deps.shell.run(&line, &session.source, TRANSFER_TIMEOUT).await?;
        if code != 0 {
            return Err(PushError::Transfer { destination, code });
        }
        tracing::info!(
            container = name,
            destination = %session.destination,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "synced"
        );

        if options.skip_restart {
            tracing::debug!(container = name, "restart skipped");
        } else {
            *stopped = true;
            runtime.stop_container(name, STOP_GRACE).await?;
            runtime.start_container(name).await?;
            tracing::info!(container = name, "container restarted");
        }

        if let Some(after) = &session.after {
            self.run_hook("after", after, &session.source).await?;
        }
        Ok(())
    }

    /// Best effort. A failed restart is logged; the original error still wins.
    async fn restart_after_failure(&self, name: &str, cause: &PushError) {
        tracing::warn!(container = name, error = %cause, "sync failed, starting container again");
        if let Err(e) = self.deps.runtime.start_container(name).await {
            tracing::error!(container = name, error = %e, "could not start container after failed sync");
        }
    }

    async fn run_hook(
        &self,
        hook: &'static str,
        command: &str,
        cwd: &Path,
    ) -> Result<(), PushError> {
        tracing::info!(hook, %command, "running hook");
        let code = self.deps.shell.run(command, cwd, HOOK_TIMEOUT).await?;
        if code != 0 {
            return Err(PushError::Hook { hook, command: command.to_string(), code });
        }
        Ok(())
    }

    fn record_sync_settings(&self, options: &PushOptions) -> Result<(), PushError> {
        let mut config = self.deps.store.load(&options.source)?;
        options.record_sync_settings(&mut config);
        self.deps.store.save(&options.source, &config)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "push_tests.rs"]
mod tests;
