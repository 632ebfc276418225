// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rebuild-or-sync decision.

use crate::error::PushError;
use crate::triggers::{build_trigger_set, check_triggers};
use lp_adapters::{ConfigStore, ContainerRuntime};
use lp_core::{PushOptions, RebuildDecision, RebuildReason, TriggerSet};

/// Combines trigger hashes, force flags and runtime state into one decision.
pub struct BuildDecisionEngine<R: ContainerRuntime, C: ConfigStore> {
    runtime: R,
    store: C,
}

impl<R: ContainerRuntime, C: ConfigStore> BuildDecisionEngine<R, C> {
    pub fn new(runtime: R, store: C) -> Self {
        Self { runtime, store }
    }

    /// Rebuild iff any check fires. The trigger, image and container checks
    /// are independent and run concurrently.
    pub async fn decide(&self, options: &PushOptions) -> Result<RebuildDecision, PushError> {
        let name = options.app_name.as_str();
        let (changed, image_exists, running) = tokio::join!(
            check_triggers(&options.saved_triggers, &options.source),
            self.runtime.image_exists(name),
            self.runtime.container_running(name),
        );
        let image_exists = image_exists?;
        let running = running?;

        let checks = [
            (options.saved_triggers.is_empty(), RebuildReason::NoSavedTriggers),
            (options.triggers_overridden, RebuildReason::CliOverride),
            (options.force_build, RebuildReason::Forced),
            (changed, RebuildReason::TriggerChanged),
            (!image_exists, RebuildReason::ImageMissing),
            (!running, RebuildReason::ContainerNotRunning),
        ];
        let decision = RebuildDecision::from_reasons(
            checks.into_iter().filter(|(fired, _)| *fired).map(|(_, reason)| reason),
        );
        tracing::info!(app = %options.app_name, %decision, "build decision");
        Ok(decision)
    }

    /// Hash the effective trigger list and persist it with the app name and
    /// environment. Must run before the build starts.
    pub async fn record_triggers(&self, options: &PushOptions) -> Result<TriggerSet, PushError> {
        let triggers = build_trigger_set(&options.build_triggers, &options.source, true).await?;
        let mut config = self.store.load(&options.source)?;
        options.record_build_settings(&mut config, triggers.clone());
        self.store.save(&options.source, &config)?;
        tracing::debug!(count = triggers.len(), "build triggers recorded");
        Ok(triggers)
    }
}

#[cfg(test)]
#[path = "decision_tests.rs"]
mod tests;
