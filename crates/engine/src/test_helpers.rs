// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for engine tests.

use lp_adapters::{FakeConfigStore, FakeRemoteExec, FakeRuntime, FakeShell};
use lp_core::test_support::trigger_set;
use lp_core::{AppName, PushOptions};
use tempfile::TempDir;

pub(crate) const DOCKERFILE_HASH: &str =
    "f6aca399ab7883e1ebdf61b6d22756df83626409f824c0f6d80c2148478769b2";
pub(crate) const PACKAGE_HASH: &str =
    "e2c193459707068888808a4e89c745162ed4e24bc093ac72f0009f5f15992cbb";

pub(crate) const APP: &str = "my-app";
pub(crate) const DEVICE: &str = "10.0.0.7";
pub(crate) const MERGED_DIR: &str = "/var/lib/docker/overlay2/abc123/merged";

/// Project directory with a Dockerfile and package.json whose hashes are known.
pub(crate) fn project() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Dockerfile"), "Dockerfile contents").unwrap();
    std::fs::write(dir.path().join("package.json"), "package.json contents").unwrap();
    dir
}

/// Options whose saved triggers match [`project`].
pub(crate) fn synced_options(dir: &TempDir) -> PushOptions {
    PushOptions::builder()
        .source(dir.path())
        .device(DEVICE)
        .app_name(AppName::parse(APP).unwrap())
        .saved_triggers(trigger_set(&[("Dockerfile", DOCKERFILE_HASH), ("package.json", PACKAGE_HASH)]))
        .build_triggers(vec!["Dockerfile".to_string(), "package.json".to_string()])
        .build()
}

/// Runtime with the app image present and its container running on overlay2.
pub(crate) fn running_runtime() -> FakeRuntime {
    FakeRuntime::new()
        .with_driver_data("MergedDir", MERGED_DIR)
        .with_image(APP, "sha256:current")
        .with_container(APP, "c0ffee", true)
}

pub(crate) struct Fakes {
    pub runtime: FakeRuntime,
    pub remote: FakeRemoteExec,
    pub shell: FakeShell,
    pub store: FakeConfigStore,
}

impl Fakes {
    pub(crate) fn new(runtime: FakeRuntime) -> Self {
        Self {
            runtime,
            remote: FakeRemoteExec::new(),
            shell: FakeShell::new(),
            store: FakeConfigStore::new(),
        }
    }
}
