// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Docker Engine API client for the device's runtime.
//!
//! The device exposes the API over plain TCP. balenaEngine speaks the same
//! API, so one client covers both.

use super::context::pack_directory_async;
use super::{absorbs, ContainerRuntime, ContainerSpec, RuntimeError, RuntimeOp, STOP_GRACE};
use crate::progress::{BuildProgress, ProgressError, ProgressEvent};
use async_trait::async_trait;
use bollard::container::{
    Config, CreateContainerOptions, InspectContainerOptions, LogsOptions, RemoveContainerOptions,
    StartContainerOptions, StopContainerOptions,
};
use bollard::errors::Error as BollardError;
use bollard::image::{BuildImageOptions, ListImagesOptions, RemoveImageOptions};
use bollard::models::{BuildInfo, HostConfig, RestartPolicy, RestartPolicyNameEnum};
use bollard::Docker;
use bytes::Bytes;
use futures_util::StreamExt;
use lp_core::{ContainerInfo, ContainerState, EngineFlavor, ImageRef, RuntimeInfo};
use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use std::time::{Duration, Instant};

/// Runtime client bound to one device.
#[derive(Clone)]
pub struct BollardRuntime {
    docker: Docker,
    addr: String,
    timeout: Duration,
}

impl BollardRuntime {
    /// Connect to the runtime API at `host:port`. No request is made until first use.
    pub fn connect(host: &str, port: u16, timeout: Duration) -> Result<Self, RuntimeError> {
        let addr = format!("tcp://{host}:{port}");
        let docker =
            Docker::connect_with_http(&addr, timeout.as_secs(), bollard::API_DEFAULT_VERSION)
                .map_err(|e| RuntimeError::Connect { addr: addr.clone(), cause: e.to_string() })?;
        tracing::debug!(%addr, timeout_secs = timeout.as_secs(), "runtime client created");
        Ok(Self { docker, addr, timeout })
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Await a request under the client deadline, absorbing idempotent failures.
    ///
    /// Returns `Ok(None)` when the backend status is one [`absorbs`] accepts for `op`.
    async fn call<T, F>(&self, op: RuntimeOp, name: &str, fut: F) -> Result<Option<T>, RuntimeError>
    where
        F: Future<Output = Result<T, BollardError>> + Send,
    {
        let start = Instant::now();
        let result = tokio::time::timeout(self.timeout, fut).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;
        match result {
            Err(_) => Err(RuntimeError::backend(
                op,
                name,
                format!("timed out after {}s", self.timeout.as_secs()),
            )),
            Ok(Ok(value)) => {
                tracing::trace!(%op, name, elapsed_ms, "runtime call ok");
                Ok(Some(value))
            }
            Ok(Err(e)) => match status_code(&e) {
                Some(status) if absorbs(op, status) => {
                    tracing::debug!(%op, name, status, elapsed_ms, "runtime call absorbed");
                    Ok(None)
                }
                _ => Err(RuntimeError::backend(op, name, e)),
            },
        }
    }
}

fn status_code(err: &BollardError) -> Option<u16> {
    match err {
        BollardError::DockerResponseServerError { status_code, .. } => Some(*status_code),
        _ => None,
    }
}

impl From<BuildInfo> for ProgressEvent {
    fn from(info: BuildInfo) -> Self {
        let error = info.error.or_else(|| info.error_detail.and_then(|d| d.message));
        ProgressEvent {
            id: info.id,
            status: info.status,
            progress: info.progress,
            stream: info.stream,
            error,
        }
    }
}

#[async_trait]
impl ContainerRuntime for BollardRuntime {
    async fn inspect_image(&self, name: &str) -> Result<Option<ImageRef>, RuntimeError> {
        let inspect = self.call(RuntimeOp::InspectImage, name, self.docker.inspect_image(name)).await?;
        Ok(inspect.map(|image| ImageRef {
            name: name.to_string(),
            id: image.id.unwrap_or_default(),
            cmd: image.config.and_then(|c| c.cmd),
        }))
    }

    async fn list_image_ids(&self) -> Result<Vec<String>, RuntimeError> {
        let options = ListImagesOptions::<String> { all: false, ..Default::default() };
        let images = self
            .call(RuntimeOp::ListImages, "*", self.docker.list_images(Some(options)))
            .await?
            .unwrap_or_default();
        Ok(images.into_iter().map(|image| image.id).collect())
    }

    async fn inspect_container(&self, name: &str) -> Result<Option<ContainerInfo>, RuntimeError> {
        let inspect = self
            .call(
                RuntimeOp::InspectContainer,
                name,
                self.docker.inspect_container(name, None::<InspectContainerOptions>),
            )
            .await?;
        Ok(inspect.map(|container| {
            let running = container.state.and_then(|s| s.running).unwrap_or(false);
            let (driver, driver_data) =
                container.graph_driver.map(|g| (g.name, g.data)).unwrap_or_default();
            ContainerInfo {
                id: container.id.unwrap_or_default(),
                state: if running { ContainerState::Running } else { ContainerState::Stopped },
                driver,
                driver_data,
            }
        }))
    }

    async fn build_image(
        &self,
        base_dir: &Path,
        name: &str,
        cache_from: &[String],
        progress: &mut dyn BuildProgress,
    ) -> Result<(), RuntimeError> {
        let context = pack_directory_async(base_dir)
            .await
            .map_err(|source| RuntimeError::Context { path: base_dir.to_path_buf(), source })?;
        tracing::info!(
            image = name,
            context_bytes = context.len(),
            cache_hints = cache_from.len(),
            "building image"
        );

        let options = BuildImageOptions {
            dockerfile: "Dockerfile".to_string(),
            t: name.to_string(),
            cachefrom: cache_from.to_vec(),
            rm: true,
            ..Default::default()
        };
        let start = Instant::now();
        let mut stream = self.docker.build_image(options, None, Some(Bytes::from(context)));
        while let Some(item) = stream.next().await {
            let info = item.map_err(|e| RuntimeError::backend(RuntimeOp::BuildImage, name, e))?;
            progress.report(&ProgressEvent::from(info)).map_err(|e| match e {
                ProgressError::Build(message) => {
                    RuntimeError::Build { name: name.to_string(), message }
                }
                ProgressError::Io(e) => RuntimeError::backend(RuntimeOp::BuildImage, name, e),
            })?;
        }
        tracing::info!(
            image = name,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "image built"
        );
        Ok(())
    }

    async fn create_container(&self, name: &str, env: &[String]) -> Result<(), RuntimeError> {
        let spec = ContainerSpec::new(name, env)?;
        let image_cmd = self.inspect_image(name).await?.and_then(|image| image.cmd);
        let spec = spec.with_image_cmd(image_cmd);

        let config = Config {
            image: Some(spec.image),
            cmd: Some(spec.cmd),
            env: Some(spec.env),
            tty: Some(true),
            volumes: Some(spec.volumes.into_iter().map(|v| (v, HashMap::new())).collect()),
            host_config: Some(HostConfig {
                privileged: Some(true),
                network_mode: Some("host".to_string()),
                restart_policy: Some(RestartPolicy {
                    name: Some(RestartPolicyNameEnum::ALWAYS),
                    maximum_retry_count: None,
                }),
                binds: Some(spec.binds),
                ..Default::default()
            }),
            ..Default::default()
        };
        let options = CreateContainerOptions { name: name.to_string(), platform: None };
        self.call(
            RuntimeOp::CreateContainer,
            name,
            self.docker.create_container(Some(options), config),
        )
        .await?;
        tracing::info!(container = name, "container created");
        Ok(())
    }

    async fn start_container(&self, name: &str) -> Result<(), RuntimeError> {
        self.call(
            RuntimeOp::StartContainer,
            name,
            self.docker.start_container(name, None::<StartContainerOptions<String>>),
        )
        .await?;
        Ok(())
    }

    async fn stop_container(&self, name: &str, grace: Duration) -> Result<(), RuntimeError> {
        let t = i64::try_from(grace.as_secs()).unwrap_or(STOP_GRACE.as_secs() as i64);
        // The runtime holds the request open for the grace period.
        let stop = self.docker.stop_container(name, Some(StopContainerOptions { t }));
        let deadline = self.timeout + grace;
        match tokio::time::timeout(deadline, stop).await {
            Err(_) => Err(RuntimeError::backend(
                RuntimeOp::StopContainer,
                name,
                format!("timed out after {}s", deadline.as_secs()),
            )),
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => match status_code(&e) {
                Some(status) if absorbs(RuntimeOp::StopContainer, status) => {
                    tracing::debug!(container = name, status, "stop absorbed");
                    Ok(())
                }
                _ => Err(RuntimeError::backend(RuntimeOp::StopContainer, name, e)),
            },
        }
    }

    async fn remove_container(&self, name: &str) -> Result<(), RuntimeError> {
        let options = RemoveContainerOptions { v: true, ..Default::default() };
        self.call(
            RuntimeOp::RemoveContainer,
            name,
            self.docker.remove_container(name, Some(options)),
        )
        .await?;
        Ok(())
    }

    async fn remove_image(&self, id: &str) -> Result<(), RuntimeError> {
        let options = RemoveImageOptions { force: true, ..Default::default() };
        self.call(RuntimeOp::RemoveImage, id, self.docker.remove_image(id, Some(options), None))
            .await?;
        Ok(())
    }

    async fn runtime_info(&self) -> Result<RuntimeInfo, RuntimeError> {
        let (info, version) = tokio::try_join!(
            self.call(RuntimeOp::Info, &self.addr, self.docker.info()),
            self.call(RuntimeOp::Info, &self.addr, self.docker.version()),
        )?;
        let info = info.unwrap_or_default();
        let version = version.unwrap_or_default();

        let root_dir = info.docker_root_dir.unwrap_or_default();
        let platform = version.platform.map(|p| p.name).unwrap_or_default();
        let flavor = if root_dir.contains("balena") || platform.to_lowercase().contains("balena")
        {
            EngineFlavor::Balena
        } else {
            EngineFlavor::Docker
        };
        Ok(RuntimeInfo {
            root_dir,
            driver: info.driver.unwrap_or_default(),
            version: version.version.unwrap_or_default(),
            flavor,
        })
    }

    async fn follow_logs(
        &self,
        name: &str,
        out: &mut (dyn std::io::Write + Send),
    ) -> Result<(), RuntimeError> {
        let options = LogsOptions::<String> {
            follow: true,
            stdout: true,
            stderr: true,
            tail: "100".to_string(),
            ..Default::default()
        };
        let mut stream = self.docker.logs(name, Some(options));
        while let Some(item) = stream.next().await {
            let chunk = item.map_err(|e| RuntimeError::backend(RuntimeOp::FollowLogs, name, e))?;
            out.write_all(&chunk.into_bytes())
                .and_then(|_| out.flush())
                .map_err(|e| RuntimeError::backend(RuntimeOp::FollowLogs, name, e))?;
        }
        Ok(())
    }
}
