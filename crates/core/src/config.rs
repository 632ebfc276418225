// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted per-project record (`.localpush.yml`).
//!
//! The record is read once before option resolution and written back after a
//! destination change or a successful rebuild decision. Keys this tool does
//! not know about are carried through unchanged.

use crate::triggers::TriggerSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// File name of the record inside the project directory.
pub const CONFIG_FILE: &str = ".localpush.yml";

/// Older file name, still read when [`CONFIG_FILE`] is absent.
pub const LEGACY_CONFIG_FILE: &str = ".local-push.yml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("{}: top level must be a mapping", .0.display())]
    Invalid(PathBuf),
}

/// Device-specific section of the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceSection {
    #[serde(rename = "app-name", default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(rename = "build-triggers", default, skip_serializing_if = "TriggerSet::is_empty")]
    pub build_triggers: TriggerSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl DeviceSection {
    pub fn is_empty(&self) -> bool {
        self.app_name.is_none()
            && self.build_triggers.is_empty()
            && self.environment.is_none()
            && self.extra.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore: Option<Vec<String>>,
    #[serde(rename = "local_device", default, skip_serializing_if = "DeviceSection::is_empty")]
    pub device: DeviceSection,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl SyncConfig {
    /// Parse record contents. `path` is only used in error messages.
    ///
    /// An empty document is an empty record.
    pub fn from_yaml(contents: &str, path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let value: serde_yaml::Value = serde_yaml::from_str(contents)
            .map_err(|source| ConfigError::Parse { path: path.clone(), source })?;
        match value {
            serde_yaml::Value::Null => Ok(Self::default()),
            serde_yaml::Value::Mapping(_) => serde_yaml::from_value(value)
                .map_err(|source| ConfigError::Parse { path, source }),
            _ => Err(ConfigError::Invalid(path)),
        }
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
