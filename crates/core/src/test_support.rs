// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Helpers and proptest strategies for tests in this and other crates.

use crate::triggers::{TriggerFile, TriggerSet};

/// Build a trigger set from `(path, hash)` pairs.
pub fn trigger_set(pairs: &[(&str, &str)]) -> TriggerSet {
    pairs.iter().map(|(path, hash)| TriggerFile::new(*path, *hash)).collect()
}

pub mod strategies {
    use proptest::prelude::*;

    /// Valid application names.
    pub fn arb_app_name() -> impl Strategy<Value = String> {
        "[a-z0-9]([a-z0-9-]{0,20}[a-z0-9])?"
    }

    /// Valid `NAME=value` environment entries.
    pub fn arb_env_entry() -> impl Strategy<Value = String> {
        ("[A-Za-z_][A-Za-z0-9_]{0,10}", "[ -~]{0,16}").prop_map(|(k, v)| format!("{k}={v}"))
    }
}
