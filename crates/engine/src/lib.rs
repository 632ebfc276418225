// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! lp-engine: Build-vs-sync decision and container lifecycle orchestration

pub mod decision;
pub mod error;
pub mod push;
pub mod rootdir;
pub mod transfer;
pub mod triggers;

#[cfg(test)]
mod test_helpers;

pub use decision::BuildDecisionEngine;
pub use error::PushError;
pub use push::{ensure_dockerfile, PushDeps, PushReport, PushState, SyncOrchestrator};
pub use rootdir::{RootDirError, RootDirLocation, RootDirResolver};
pub use transfer::{remote_wrapper, TransferCommand};
pub use triggers::{
    build_trigger_set, check_triggers, hash_file, hash_file_with, HashAlgorithm, TriggerError,
};
