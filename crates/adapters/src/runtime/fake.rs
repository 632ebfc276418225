// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ContainerRuntime, ContainerSpec, RuntimeError, RuntimeOp};
use crate::progress::{BuildProgress, ProgressError, ProgressEvent};
use async_trait::async_trait;
use lp_core::{ContainerInfo, ContainerState, EngineFlavor, ImageRef, RuntimeInfo};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Recorded runtime call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeCall {
    InspectImage(String),
    ListImages,
    InspectContainer(String),
    BuildImage { name: String, cache_from: Vec<String> },
    CreateContainer { name: String, env: Vec<String>, cmd: Vec<String> },
    StartContainer(String),
    StopContainer(String),
    RemoveContainer(String),
    RemoveImage(String),
    RuntimeInfo,
    FollowLogs(String),
}

#[derive(Debug, Clone)]
struct FakeContainer {
    id: String,
    running: bool,
    driver_data: HashMap<String, String>,
}

struct FakeRuntimeState {
    images: HashMap<String, ImageRef>,
    containers: HashMap<String, FakeContainer>,
    info: RuntimeInfo,
    driver_data: HashMap<String, String>,
    built_image_id: String,
    build_events: Vec<ProgressEvent>,
    logs: String,
    failures: HashMap<RuntimeOp, String>,
    calls: Vec<RuntimeCall>,
}

/// In-memory container runtime for tests.
///
/// Images and containers live in maps; operations mutate them the way the
/// real runtime would, including the idempotent cases.
#[derive(Clone)]
pub struct FakeRuntime {
    inner: Arc<Mutex<FakeRuntimeState>>,
}

impl Default for FakeRuntime {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeRuntimeState {
                images: HashMap::new(),
                containers: HashMap::new(),
                info: RuntimeInfo {
                    root_dir: "/var/lib/docker".to_string(),
                    driver: "overlay2".to_string(),
                    version: "24.0.7".to_string(),
                    flavor: EngineFlavor::Docker,
                },
                driver_data: HashMap::new(),
                built_image_id: "sha256:built".to_string(),
                build_events: Vec::new(),
                logs: String::new(),
                failures: HashMap::new(),
                calls: Vec::new(),
            })),
        }
    }
}

impl FakeRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(self, name: &str, id: &str) -> Self {
        self.inner.lock().images.insert(name.to_string(), ImageRef::new(name, id));
        self
    }

    /// Image that declares its own default command.
    pub fn with_image_cmd(self, name: &str, id: &str, cmd: &[&str]) -> Self {
        let mut image = ImageRef::new(name, id);
        image.cmd = Some(cmd.iter().map(|s| s.to_string()).collect());
        self.inner.lock().images.insert(name.to_string(), image);
        self
    }

    pub fn with_container(self, name: &str, id: &str, running: bool) -> Self {
        {
            let mut state = self.inner.lock();
            let driver_data = state.driver_data.clone();
            state
                .containers
                .insert(name.to_string(), FakeContainer { id: id.to_string(), running, driver_data });
        }
        self
    }

    /// Storage driver and data root reported by the runtime.
    pub fn with_driver(self, driver: &str, root_dir: &str) -> Self {
        {
            let mut state = self.inner.lock();
            state.info.driver = driver.to_string();
            state.info.root_dir = root_dir.to_string();
        }
        self
    }

    pub fn with_version(self, version: &str) -> Self {
        self.inner.lock().info.version = version.to_string();
        self
    }

    pub fn with_flavor(self, flavor: EngineFlavor) -> Self {
        self.inner.lock().info.flavor = flavor;
        self
    }

    /// Driver data for containers, applied to existing and future containers.
    pub fn with_driver_data(self, key: &str, value: &str) -> Self {
        {
            let mut state = self.inner.lock();
            state.driver_data.insert(key.to_string(), value.to_string());
            for container in state.containers.values_mut() {
                container.driver_data.insert(key.to_string(), value.to_string());
            }
        }
        self
    }

    /// Id given to the next built image.
    pub fn with_built_image_id(self, id: &str) -> Self {
        self.inner.lock().built_image_id = id.to_string();
        self
    }

    /// Events replayed to the progress sink during a build.
    pub fn with_build_events(self, events: Vec<ProgressEvent>) -> Self {
        self.inner.lock().build_events = events;
        self
    }

    pub fn with_logs(self, logs: &str) -> Self {
        self.inner.lock().logs = logs.to_string();
        self
    }

    /// Make every call of `op` fail with a backend error.
    pub fn fail_on(&self, op: RuntimeOp, cause: &str) {
        self.inner.lock().failures.insert(op, cause.to_string());
    }

    pub fn clear_failure(&self, op: RuntimeOp) {
        self.inner.lock().failures.remove(&op);
    }

    pub fn calls(&self) -> Vec<RuntimeCall> {
        self.inner.lock().calls.clone()
    }

    /// Calls excluding read-only inspections.
    pub fn mutations(&self) -> Vec<RuntimeCall> {
        self.calls()
            .into_iter()
            .filter(|c| {
                !matches!(
                    c,
                    RuntimeCall::InspectImage(_)
                        | RuntimeCall::InspectContainer(_)
                        | RuntimeCall::ListImages
                        | RuntimeCall::RuntimeInfo
                )
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&RuntimeCall) -> bool) -> usize {
        self.inner.lock().calls.iter().filter(|c| pred(c)).count()
    }

    pub fn image_id(&self, name: &str) -> Option<String> {
        self.inner.lock().images.get(name).map(|i| i.id.clone())
    }

    pub fn has_image_id(&self, id: &str) -> bool {
        self.inner.lock().images.values().any(|i| i.id == id)
    }

    pub fn container_state_now(&self, name: &str) -> ContainerState {
        match self.inner.lock().containers.get(name) {
            Some(c) if c.running => ContainerState::Running,
            Some(_) => ContainerState::Stopped,
            None => ContainerState::Missing,
        }
    }

    fn record(&self, call: RuntimeCall, op: RuntimeOp, name: &str) -> Result<(), RuntimeError> {
        let mut state = self.inner.lock();
        state.calls.push(call);
        match state.failures.get(&op) {
            Some(cause) => Err(RuntimeError::backend(op, name, cause)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ContainerRuntime for FakeRuntime {
    async fn inspect_image(&self, name: &str) -> Result<Option<ImageRef>, RuntimeError> {
        self.record(RuntimeCall::InspectImage(name.to_string()), RuntimeOp::InspectImage, name)?;
        Ok(self.inner.lock().images.get(name).cloned())
    }

    async fn list_image_ids(&self) -> Result<Vec<String>, RuntimeError> {
        self.record(RuntimeCall::ListImages, RuntimeOp::ListImages, "*")?;
        let mut ids: Vec<String> = self.inner.lock().images.values().map(|i| i.id.clone()).collect();
        ids.sort();
        Ok(ids)
    }

    async fn inspect_container(&self, name: &str) -> Result<Option<ContainerInfo>, RuntimeError> {
        self.record(
            RuntimeCall::InspectContainer(name.to_string()),
            RuntimeOp::InspectContainer,
            name,
        )?;
        let state = self.inner.lock();
        Ok(state.containers.get(name).map(|c| ContainerInfo {
            id: c.id.clone(),
            state: if c.running { ContainerState::Running } else { ContainerState::Stopped },
            driver: state.info.driver.clone(),
            driver_data: c.driver_data.clone(),
        }))
    }

    async fn build_image(
        &self,
        _base_dir: &Path,
        name: &str,
        cache_from: &[String],
        progress: &mut dyn BuildProgress,
    ) -> Result<(), RuntimeError> {
        self.record(
            RuntimeCall::BuildImage { name: name.to_string(), cache_from: cache_from.to_vec() },
            RuntimeOp::BuildImage,
            name,
        )?;
        let events = self.inner.lock().build_events.clone();
        for event in &events {
            progress.report(event).map_err(|e| match e {
                ProgressError::Build(message) => {
                    RuntimeError::Build { name: name.to_string(), message }
                }
                ProgressError::Io(e) => RuntimeError::backend(RuntimeOp::BuildImage, name, e),
            })?;
        }
        let mut state = self.inner.lock();
        let id = state.built_image_id.clone();
        state.images.insert(name.to_string(), ImageRef::new(name, id));
        Ok(())
    }

    async fn create_container(&self, name: &str, env: &[String]) -> Result<(), RuntimeError> {
        let spec = ContainerSpec::new(name, env)?;
        let image_cmd = self.inner.lock().images.get(name).and_then(|i| i.cmd.clone());
        let spec = spec.with_image_cmd(image_cmd);
        self.record(
            RuntimeCall::CreateContainer {
                name: name.to_string(),
                env: spec.env.clone(),
                cmd: spec.cmd.clone(),
            },
            RuntimeOp::CreateContainer,
            name,
        )?;
        let mut state = self.inner.lock();
        if !state.images.contains_key(name) {
            return Err(RuntimeError::backend(
                RuntimeOp::CreateContainer,
                name,
                format!("No such image: {name}"),
            ));
        }
        if state.containers.contains_key(name) {
            return Err(RuntimeError::backend(
                RuntimeOp::CreateContainer,
                name,
                "container name already in use",
            ));
        }
        let driver_data = state.driver_data.clone();
        state.containers.insert(
            name.to_string(),
            FakeContainer { id: format!("ctr-{name}"), running: false, driver_data },
        );
        Ok(())
    }

    async fn start_container(&self, name: &str) -> Result<(), RuntimeError> {
        self.record(RuntimeCall::StartContainer(name.to_string()), RuntimeOp::StartContainer, name)?;
        match self.inner.lock().containers.get_mut(name) {
            Some(c) => {
                c.running = true;
                Ok(())
            }
            None => Err(RuntimeError::backend(
                RuntimeOp::StartContainer,
                name,
                format!("No such container: {name}"),
            )),
        }
    }

    async fn stop_container(&self, name: &str, _grace: Duration) -> Result<(), RuntimeError> {
        self.record(RuntimeCall::StopContainer(name.to_string()), RuntimeOp::StopContainer, name)?;
        if let Some(c) = self.inner.lock().containers.get_mut(name) {
            c.running = false;
        }
        Ok(())
    }

    async fn remove_container(&self, name: &str) -> Result<(), RuntimeError> {
        self.record(
            RuntimeCall::RemoveContainer(name.to_string()),
            RuntimeOp::RemoveContainer,
            name,
        )?;
        self.inner.lock().containers.remove(name);
        Ok(())
    }

    async fn remove_image(&self, id: &str) -> Result<(), RuntimeError> {
        self.record(RuntimeCall::RemoveImage(id.to_string()), RuntimeOp::RemoveImage, id)?;
        self.inner.lock().images.retain(|_, image| image.id != id);
        Ok(())
    }

    async fn runtime_info(&self) -> Result<RuntimeInfo, RuntimeError> {
        self.record(RuntimeCall::RuntimeInfo, RuntimeOp::Info, "runtime")?;
        Ok(self.inner.lock().info.clone())
    }

    async fn follow_logs(
        &self,
        name: &str,
        out: &mut (dyn std::io::Write + Send),
    ) -> Result<(), RuntimeError> {
        self.record(RuntimeCall::FollowLogs(name.to_string()), RuntimeOp::FollowLogs, name)?;
        let logs = self.inner.lock().logs.clone();
        out.write_all(logs.as_bytes())
            .map_err(|e| RuntimeError::backend(RuntimeOp::FollowLogs, name, e))
    }
}
