// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! lp-core: Data model and pure logic for the localpush (lp) CLI tool

pub mod macros;

pub mod config;
pub mod container;
pub mod decision;
pub mod ignore;
pub mod options;
pub mod session;
pub mod triggers;
pub mod validate;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::{ConfigError, DeviceSection, SyncConfig, CONFIG_FILE, LEGACY_CONFIG_FILE};
pub use container::{ContainerInfo, ContainerState, EngineFlavor, ImageRef, RuntimeInfo};
pub use decision::{RebuildDecision, RebuildReason};
pub use ignore::IgnorePatterns;
#[cfg(any(test, feature = "test-support"))]
pub use options::PushOptionsBuilder;
pub use options::{
    CliOverrides, PushOptions, DEFAULT_APP_NAME, DEFAULT_DESTINATION, DEFAULT_DOCKER_PORT,
    DEFAULT_IGNORE, DEFAULT_SSH_PORT, IMPLICIT_TRIGGERS,
};
pub use session::{SyncSession, Transport};
pub use triggers::{TriggerFile, TriggerSet};
pub use validate::{validate_env, AppName, ValidationError};
