// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::rootdir::RootDirError;
use crate::triggers::TriggerError;
use lp_adapters::{RuntimeError, ShellError};
use lp_core::{ConfigError, ValidationError};
use thiserror::Error;

/// Any failure that ends a push.
#[derive(Debug, Error)]
pub enum PushError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Trigger(#[from] TriggerError),
    #[error("container '{0}' must be running before attempting sync")]
    Precondition(String),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error(transparent)]
    RootDir(RootDirError),
    #[error("transfer to {destination} failed with exit code {code}")]
    Transfer { destination: String, code: i32 },
    #[error("{hook} hook `{command}` failed with exit code {code}")]
    Hook { hook: &'static str, command: String, code: i32 },
    #[error(transparent)]
    Shell(#[from] ShellError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to read ignore file: {0}")]
    Ignore(#[source] std::io::Error),
}

impl From<RootDirError> for PushError {
    fn from(err: RootDirError) -> Self {
        match err {
            RootDirError::NotRunning(name) => PushError::Precondition(name),
            RootDirError::Runtime(e) => PushError::Runtime(e),
            other => PushError::RootDir(other),
        }
    }
}
