// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Load and save of the per-project record.

use lp_core::{ConfigError, SyncConfig, CONFIG_FILE, LEGACY_CONFIG_FILE};
use std::path::{Path, PathBuf};

/// Storage for the record kept in a project directory.
pub trait ConfigStore: Clone + Send + Sync + 'static {
    /// Whether `dir` holds a record under the current or legacy name.
    fn exists(&self, dir: &Path) -> bool;

    /// Load the record, or an empty one if none exists.
    fn load(&self, dir: &Path) -> Result<SyncConfig, ConfigError>;

    fn save(&self, dir: &Path, config: &SyncConfig) -> Result<(), ConfigError>;
}

/// YAML file in the project directory.
#[derive(Clone, Copy, Debug, Default)]
pub struct YamlConfigStore;

impl YamlConfigStore {
    pub fn new() -> Self {
        Self
    }

    fn existing_path(dir: &Path) -> Option<PathBuf> {
        [CONFIG_FILE, LEGACY_CONFIG_FILE].iter().map(|name| dir.join(name)).find(|p| p.is_file())
    }
}

impl ConfigStore for YamlConfigStore {
    fn exists(&self, dir: &Path) -> bool {
        Self::existing_path(dir).is_some()
    }

    fn load(&self, dir: &Path) -> Result<SyncConfig, ConfigError> {
        let Some(path) = Self::existing_path(dir) else {
            return Ok(SyncConfig::default());
        };
        let contents = std::fs::read_to_string(&path)
            .map_err(|source| ConfigError::Io { path: path.clone(), source })?;
        tracing::debug!(path = %path.display(), "loaded config record");
        SyncConfig::from_yaml(&contents, path)
    }

    fn save(&self, dir: &Path, config: &SyncConfig) -> Result<(), ConfigError> {
        let path = dir.join(CONFIG_FILE);
        let yaml = config
            .to_yaml()
            .map_err(|source| ConfigError::Parse { path: path.clone(), source })?;
        // Write-then-rename: an interrupted save leaves the old record intact.
        let tmp = dir.join(format!("{CONFIG_FILE}.tmp"));
        std::fs::write(&tmp, yaml)
            .and_then(|_| std::fs::rename(&tmp, &path))
            .map_err(|source| ConfigError::Io { path: path.clone(), source })?;
        tracing::debug!(path = %path.display(), "saved config record");
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeConfigStore;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::ConfigStore;
    use lp_core::{ConfigError, SyncConfig};
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeConfigState {
        records: HashMap<PathBuf, SyncConfig>,
        saves: Vec<SyncConfig>,
        fail_saves: bool,
    }

    /// In-memory record store that keeps every saved version.
    #[derive(Clone, Default)]
    pub struct FakeConfigStore {
        inner: Arc<Mutex<FakeConfigState>>,
    }

    impl FakeConfigStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_record(self, dir: &Path, config: SyncConfig) -> Self {
            self.inner.lock().records.insert(dir.to_path_buf(), config);
            self
        }

        pub fn failing_saves(self) -> Self {
            self.inner.lock().fail_saves = true;
            self
        }

        /// Every record passed to `save`, oldest first.
        pub fn saves(&self) -> Vec<SyncConfig> {
            self.inner.lock().saves.clone()
        }

        pub fn record(&self, dir: &Path) -> Option<SyncConfig> {
            self.inner.lock().records.get(dir).cloned()
        }
    }

    impl ConfigStore for FakeConfigStore {
        fn exists(&self, dir: &Path) -> bool {
            self.inner.lock().records.contains_key(dir)
        }

        fn load(&self, dir: &Path) -> Result<SyncConfig, ConfigError> {
            Ok(self.inner.lock().records.get(dir).cloned().unwrap_or_default())
        }

        fn save(&self, dir: &Path, config: &SyncConfig) -> Result<(), ConfigError> {
            let mut state = self.inner.lock();
            if state.fail_saves {
                return Err(ConfigError::Io {
                    path: dir.to_path_buf(),
                    source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
                });
            }
            state.saves.push(config.clone());
            state.records.insert(dir.to_path_buf(), config.clone());
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "config_store_tests.rs"]
mod tests;
