// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Validation of operator-supplied values.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid application name '{0}': use lowercase letters, digits and dashes, not starting or ending with a dash")]
    InvalidAppName(String),
    #[error("invalid environment variable '{0}': expected NAME=value")]
    InvalidEnv(String),
    #[error("missing required option: {0}")]
    MissingOption(&'static str),
    #[error("no Dockerfile found in {}", .0.display())]
    MissingDockerfile(PathBuf),
    #[error("Dockerfile.template found in {} but templates are not supported; provide a plain Dockerfile", .0.display())]
    DockerfileTemplate(PathBuf),
}

/// Application name; doubles as the image tag and container name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppName(String);

impl AppName {
    pub fn parse(name: &str) -> Result<Self, ValidationError> {
        let valid = !name.is_empty()
            && !name.starts_with('-')
            && !name.ends_with('-')
            && name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !valid {
            return Err(ValidationError::InvalidAppName(name.to_string()));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AppName {
    fn default() -> Self {
        Self(crate::options::DEFAULT_APP_NAME.to_string())
    }
}

impl std::fmt::Display for AppName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Check that an entry has the `NAME=value` shape, `NAME` matching `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_env_assignment(entry: &str) -> bool {
    let Some((name, _)) = entry.split_once('=') else {
        return false;
    };
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Fail on the first entry that is not `NAME=value`.
pub fn validate_env(entries: &[String]) -> Result<(), ValidationError> {
    match entries.iter().find(|e| !is_env_assignment(e)) {
        Some(bad) => Err(ValidationError::InvalidEnv(bad.clone())),
        None => Ok(()),
    }
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
