// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! lp-adapters: External collaborators of the push engine.
//!
//! Every adapter is a trait with a real implementation and, behind the
//! `test-support` feature, a recording fake.

pub mod config_store;
pub mod progress;
pub mod remote;
pub mod runtime;
pub mod shell;
pub mod subprocess;

pub use config_store::{ConfigStore, YamlConfigStore};
pub use progress::{BuildProgress, ProgressError, ProgressEvent, TerminalProgress};
pub use remote::{RemoteExec, RemoteExecError, RemoteOutput, SshExec};
pub use runtime::{BollardRuntime, ContainerRuntime, ContainerSpec, RuntimeError, RuntimeOp};
pub use shell::{LocalShell, ShellError, ShellRunner};

#[cfg(any(test, feature = "test-support"))]
pub use config_store::FakeConfigStore;
#[cfg(any(test, feature = "test-support"))]
pub use progress::RecordingProgress;
#[cfg(any(test, feature = "test-support"))]
pub use remote::{FakeRemoteExec, RemoteCall};
#[cfg(any(test, feature = "test-support"))]
pub use runtime::{FakeRuntime, RuntimeCall};
#[cfg(any(test, feature = "test-support"))]
pub use shell::{FakeShell, ShellCall};
