// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rebuild-or-sync decision types.

/// Why a rebuild was chosen over an incremental sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RebuildReason {
    /// The config record holds no trigger hashes.
    NoSavedTriggers,
    /// Trigger files were passed on the command line for this run.
    CliOverride,
    /// `--force-build` was given.
    Forced,
    /// A trigger file was deleted or its contents changed.
    TriggerChanged,
    ImageMissing,
    ContainerNotRunning,
}

crate::simple_display! {
    RebuildReason {
        NoSavedTriggers => "no-saved-triggers",
        CliOverride => "cli-override",
        Forced => "forced",
        TriggerChanged => "trigger-changed",
        ImageMissing => "image-missing",
        ContainerNotRunning => "container-not-running",
    }
}

/// Outcome of a decision pass. Derived on every run, never persisted.
///
/// Holds every reason that applied so the log explains the full picture;
/// a decision with no reasons means sync.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebuildDecision {
    reasons: Vec<RebuildReason>,
}

impl RebuildDecision {
    pub fn sync() -> Self {
        Self::default()
    }

    pub fn from_reasons(reasons: impl IntoIterator<Item = RebuildReason>) -> Self {
        let mut out: Vec<RebuildReason> = Vec::new();
        for reason in reasons {
            if !out.contains(&reason) {
                out.push(reason);
            }
        }
        Self { reasons: out }
    }

    pub fn rebuild(&self) -> bool {
        !self.reasons.is_empty()
    }

    /// Primary reason, in the order checks were listed.
    pub fn reason(&self) -> Option<RebuildReason> {
        self.reasons.first().copied()
    }

    pub fn reasons(&self) -> &[RebuildReason] {
        &self.reasons
    }

    pub fn has(&self, reason: RebuildReason) -> bool {
        self.reasons.contains(&reason)
    }
}

impl std::fmt::Display for RebuildDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.reasons.is_empty() {
            return f.write_str("sync");
        }
        let tags: Vec<String> = self.reasons.iter().map(|r| r.to_string()).collect();
        write!(f, "rebuild ({})", tags.join(", "))
    }
}

#[cfg(test)]
#[path = "decision_tests.rs"]
mod tests;
