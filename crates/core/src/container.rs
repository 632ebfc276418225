// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Point-in-time views of images, containers and the runtime host.
//!
//! None of these are cached: the container runtime is the only source of
//! truth, so every value here comes from a fresh inspect call.

use std::collections::HashMap;

/// Observed state of the application container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    Missing,
    Stopped,
    Running,
}

crate::simple_display! {
    ContainerState {
        Missing => "missing",
        Stopped => "stopped",
        Running => "running",
    }
}

impl ContainerState {
    pub fn is_running(&self) -> bool {
        matches!(self, ContainerState::Running)
    }
}

/// An image known to the runtime. `id` changes whenever a build produces new content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub name: String,
    pub id: String,
    /// Default command declared by the image, if any.
    pub cmd: Option<Vec<String>>,
}

impl ImageRef {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self { name: name.into(), id: id.into(), cmd: None }
    }
}

/// Container metadata needed to locate its writable layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerInfo {
    pub id: String,
    pub state: ContainerState,
    /// Storage-driver name reported for this container.
    pub driver: String,
    /// Storage-driver specific fields (`RootDir`, `MergedDir`, ...).
    pub driver_data: HashMap<String, String>,
}

impl ContainerInfo {
    pub fn driver_field(&self, key: &str) -> Option<&str> {
        self.driver_data.get(key).map(String::as_str)
    }
}

/// Which daemon implementation the device runs. Affects the pid file used
/// to enter its mount namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineFlavor {
    Docker,
    Balena,
}

crate::simple_display! {
    EngineFlavor {
        Docker => "docker",
        Balena => "balena",
    }
}

impl EngineFlavor {
    pub fn pid_file(&self) -> &'static str {
        match self {
            EngineFlavor::Docker => "/var/run/docker.pid",
            EngineFlavor::Balena => "/var/run/balena.pid",
        }
    }
}

/// Runtime-wide facts gathered from the info and version endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeInfo {
    /// Runtime data root, e.g. `/var/lib/docker`.
    pub root_dir: String,
    pub driver: String,
    pub version: String,
    pub flavor: EngineFlavor,
}

#[cfg(test)]
#[path = "container_tests.rs"]
mod tests;
