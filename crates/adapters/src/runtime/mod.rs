// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Container runtime client.
//!
//! # Module layout
//!
//! - [`docker`] is the Docker Engine API implementation (bollard)
//! - [`context`] packages a project directory as a build context
//! - `fake` is an in-memory runtime for tests
//!
//! Backend responses that mean "absent" or "already in that state" are
//! turned into ordinary return values here, so callers never inspect
//! status codes.

mod context;
mod docker;

pub use docker::BollardRuntime;

use crate::progress::BuildProgress;
use async_trait::async_trait;
use lp_core::{
    validate_env, ContainerInfo, ContainerState, ImageRef, RuntimeInfo, ValidationError,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Command used when the image declares none.
pub const DEFAULT_CMD: &[&str] = &["/bin/bash", "-c", "/start"];

/// Grace period before a stopped container is killed.
pub const STOP_GRACE: Duration = Duration::from_secs(10);

/// Runtime operation, carried in errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeOp {
    InspectImage,
    ListImages,
    BuildImage,
    CreateContainer,
    StartContainer,
    StopContainer,
    RemoveContainer,
    RemoveImage,
    InspectContainer,
    Info,
    FollowLogs,
}

lp_core::simple_display! {
    RuntimeOp {
        InspectImage => "inspect image",
        ListImages => "list images",
        BuildImage => "build image",
        CreateContainer => "create container",
        StartContainer => "start container",
        StopContainer => "stop container",
        RemoveContainer => "remove container",
        RemoveImage => "remove image",
        InspectContainer => "inspect container",
        Info => "runtime info",
        FollowLogs => "follow logs",
    }
}

/// Whether a backend status code counts as success for `op`.
///
/// 404 on inspect means absent; 304 on start means already running;
/// 304/404 on stop and 404 on remove mean there is nothing left to do.
pub fn absorbs(op: RuntimeOp, status: u16) -> bool {
    matches!(
        (op, status),
        (RuntimeOp::InspectImage | RuntimeOp::InspectContainer, 404)
            | (RuntimeOp::StartContainer, 304)
            | (RuntimeOp::StopContainer, 304 | 404)
            | (RuntimeOp::RemoveContainer | RuntimeOp::RemoveImage, 404)
    )
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("{op} '{name}' failed: {cause}")]
    Backend { op: RuntimeOp, name: String, cause: String },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("failed to package build context {}: {source}", path.display())]
    Context {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("build of '{name}' failed: {message}")]
    Build { name: String, message: String },
    #[error("cannot reach container runtime at {addr}: {cause}")]
    Connect { addr: String, cause: String },
}

impl RuntimeError {
    pub fn backend(op: RuntimeOp, name: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        RuntimeError::Backend { op, name: name.into(), cause: cause.to_string() }
    }
}

/// Everything needed to create the application container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec {
    pub name: String,
    /// Image tag; the application name doubles as the tag.
    pub image: String,
    pub cmd: Vec<String>,
    pub env: Vec<String>,
    /// Container paths declared as volumes.
    pub volumes: Vec<String>,
    /// `host:container` bind mounts.
    pub binds: Vec<String>,
}

impl ContainerSpec {
    /// Validate `env` and fill in the device's default mounts.
    pub fn new(name: &str, env: &[String]) -> Result<Self, ValidationError> {
        validate_env(env)?;
        Ok(Self {
            name: name.to_string(),
            image: name.to_string(),
            cmd: DEFAULT_CMD.iter().map(|s| s.to_string()).collect(),
            env: env.to_vec(),
            volumes: ["/data", "/lib/modules", "/lib/firmware", "/host/run/dbus"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            binds: vec![
                format!("/mnt/data/resin-data/{name}:/data"),
                "/lib/modules:/lib/modules".to_string(),
                "/lib/firmware:/lib/firmware".to_string(),
                "/run/dbus:/host/run/dbus".to_string(),
            ],
        })
    }

    /// Use the image's declared command when it has one.
    pub fn with_image_cmd(mut self, cmd: Option<Vec<String>>) -> Self {
        if let Some(cmd) = cmd.filter(|c| !c.is_empty()) {
            self.cmd = cmd;
        }
        self
    }
}

/// Image and container operations against one runtime host.
#[async_trait]
pub trait ContainerRuntime: Clone + Send + Sync + 'static {
    /// `None` if the image does not exist.
    async fn inspect_image(&self, name: &str) -> Result<Option<ImageRef>, RuntimeError>;

    async fn image_exists(&self, name: &str) -> Result<bool, RuntimeError> {
        Ok(self.inspect_image(name).await?.is_some())
    }

    /// Ids of all top-level images, used as build cache hints.
    async fn list_image_ids(&self) -> Result<Vec<String>, RuntimeError>;

    /// `None` if the container does not exist.
    async fn inspect_container(&self, name: &str) -> Result<Option<ContainerInfo>, RuntimeError>;

    async fn container_state(&self, name: &str) -> Result<ContainerState, RuntimeError> {
        Ok(self.inspect_container(name).await?.map_or(ContainerState::Missing, |c| c.state))
    }

    async fn container_running(&self, name: &str) -> Result<bool, RuntimeError> {
        Ok(self.container_state(name).await?.is_running())
    }

    /// Build `base_dir` into an image tagged `name`, streaming events to `progress`.
    async fn build_image(
        &self,
        base_dir: &Path,
        name: &str,
        cache_from: &[String],
        progress: &mut dyn BuildProgress,
    ) -> Result<(), RuntimeError>;

    /// Create the application container from the image of the same name.
    async fn create_container(&self, name: &str, env: &[String]) -> Result<(), RuntimeError>;

    async fn start_container(&self, name: &str) -> Result<(), RuntimeError>;

    async fn stop_container(&self, name: &str, grace: Duration) -> Result<(), RuntimeError>;

    /// Remove the container and its anonymous volumes.
    async fn remove_container(&self, name: &str) -> Result<(), RuntimeError>;

    async fn remove_image(&self, id: &str) -> Result<(), RuntimeError>;

    async fn runtime_info(&self) -> Result<RuntimeInfo, RuntimeError>;

    /// Stream the container's output until it exits or the connection drops.
    async fn follow_logs(
        &self,
        name: &str,
        out: &mut (dyn std::io::Write + Send),
    ) -> Result<(), RuntimeError>;
}

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeRuntime, RuntimeCall};

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
