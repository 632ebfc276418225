// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trigger files: the fingerprinted inputs that decide whether an image must be rebuilt.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A tracked file, relative to the project directory, and its content digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerFile {
    pub path: String,
    pub hash: String,
}

impl TriggerFile {
    pub fn new(path: impl Into<String>, hash: impl Into<String>) -> Self {
        Self { path: path.into(), hash: hash.into() }
    }
}

/// Ordered list of trigger files as persisted in the config record.
///
/// Serialized as a sequence of single-entry `{path: hash}` mappings. Order
/// follows insertion but equality checks go through [`TriggerSet::same_as`],
/// which compares the sets as unordered path to hash mappings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<BTreeMap<String, String>>", into = "Vec<BTreeMap<String, String>>")]
pub struct TriggerSet {
    entries: Vec<TriggerFile>,
}

impl TriggerSet {
    pub fn new(entries: Vec<TriggerFile>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TriggerFile> {
        self.entries.iter()
    }

    /// Relative paths in insertion order.
    pub fn paths(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.path.clone()).collect()
    }

    pub fn hash_of(&self, path: &str) -> Option<&str> {
        self.entries.iter().find(|e| e.path == path).map(|e| e.hash.as_str())
    }

    /// Compare two sets as unordered path to hash mappings.
    pub fn same_as(&self, other: &TriggerSet) -> bool {
        let lhs: HashMap<&str, &str> =
            self.entries.iter().map(|e| (e.path.as_str(), e.hash.as_str())).collect();
        let rhs: HashMap<&str, &str> =
            other.entries.iter().map(|e| (e.path.as_str(), e.hash.as_str())).collect();
        lhs == rhs
    }
}

impl From<Vec<BTreeMap<String, String>>> for TriggerSet {
    fn from(maps: Vec<BTreeMap<String, String>>) -> Self {
        let entries = maps
            .into_iter()
            .flat_map(|m| m.into_iter().map(|(path, hash)| TriggerFile { path, hash }))
            .collect();
        Self { entries }
    }
}

impl From<TriggerSet> for Vec<BTreeMap<String, String>> {
    fn from(set: TriggerSet) -> Self {
        set.entries.into_iter().map(|e| BTreeMap::from([(e.path, e.hash)])).collect()
    }
}

impl FromIterator<TriggerFile> for TriggerSet {
    fn from_iter<I: IntoIterator<Item = TriggerFile>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

#[cfg(test)]
#[path = "triggers_tests.rs"]
mod tests;
