// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Location of a container's writable layer on the device.
//!
//! | driver | path |
//! |---|---|
//! | `btrfs` | `<root>/btrfs/subvolumes/<layer>` |
//! | `overlay` | `GraphDriver.Data.RootDir` |
//! | `overlay2` | `GraphDriver.Data.MergedDir` |
//! | `vfs` | `<root>/vfs/dir/<layer>` |
//! | `aufs` | `<root>/aufs/mnt/<layer>` |
//!
//! Runtimes older than 1.10.0 name the layer after the container id; newer
//! ones record it in `<root>/image/<driver>/layerdb/mounts/<container>/mount-id`.

use crate::transfer::quote;
use lp_adapters::{ContainerRuntime, RemoteExec, RemoteExecError, RuntimeError};
use lp_core::{ContainerInfo, RuntimeInfo};
use semver::Version;
use std::path::PathBuf;
use thiserror::Error;

/// First runtime version with content-addressed layer ids.
const LAYER_DB_VERSION: Version = Version::new(1, 10, 0);

#[derive(Debug, Error)]
pub enum RootDirError {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error("container '{0}' is not running")]
    NotRunning(String),
    #[error("could not read {path} on {host}: remote exit code {code}")]
    RemoteRead { host: String, path: String, code: i32 },
    #[error(transparent)]
    Remote(#[from] RemoteExecError),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported storage driver '{0}'")]
    UnsupportedDriver(String),
    #[error("container metadata for driver '{driver}' has no {field}")]
    IncompleteMetadata { driver: String, field: &'static str },
}

/// Host path of a container's writable layer plus the runtime facts it was derived from.
///
/// Valid only for the container instance that was inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootDirLocation {
    pub path: String,
    pub runtime: RuntimeInfo,
}

pub struct RootDirResolver<R: ContainerRuntime, X: RemoteExec> {
    runtime: R,
    remote: X,
}

impl<R: ContainerRuntime, X: RemoteExec> RootDirResolver<R, X> {
    pub fn new(runtime: R, remote: X) -> Self {
        Self { runtime, remote }
    }

    /// Resolve the writable layer of the running container `name`.
    ///
    /// With `host` set, layer metadata is read over SSH on that host;
    /// otherwise it is read from the local filesystem.
    pub async fn resolve(
        &self,
        name: &str,
        host: Option<(&str, u16)>,
    ) -> Result<RootDirLocation, RootDirError> {
        let (container, runtime) =
            tokio::try_join!(self.runtime.inspect_container(name), self.runtime.runtime_info())?;
        let container = match container {
            Some(c) if c.state.is_running() => c,
            _ => return Err(RootDirError::NotRunning(name.to_string())),
        };
        let driver = runtime.driver.as_str();
        let path = match driver {
            "overlay" => driver_field(&container, driver, "RootDir")?,
            "overlay2" => driver_field(&container, driver, "MergedDir")?,
            "btrfs" | "vfs" | "aufs" => {
                let layer = self.layer_id(&runtime, &container, host).await?;
                let root = runtime.root_dir.trim_end_matches('/');
                match driver {
                    "btrfs" => format!("{root}/btrfs/subvolumes/{layer}"),
                    "vfs" => format!("{root}/vfs/dir/{layer}"),
                    _ => format!("{root}/aufs/mnt/{layer}"),
                }
            }
            other => return Err(RootDirError::UnsupportedDriver(other.to_string())),
        };
        tracing::debug!(container = name, driver, %path, "resolved container root");
        Ok(RootDirLocation { path, runtime })
    }

    async fn layer_id(
        &self,
        runtime: &RuntimeInfo,
        container: &ContainerInfo,
        host: Option<(&str, u16)>,
    ) -> Result<String, RootDirError> {
        if !uses_layer_db(&runtime.version) {
            return Ok(container.id.clone());
        }
        let path = format!(
            "{}/image/{}/layerdb/mounts/{}/mount-id",
            runtime.root_dir.trim_end_matches('/'),
            runtime.driver,
            container.id
        );
        let contents = match host {
            Some((host, port)) => {
                let command = format!("cat {}", quote(&path));
                let output = self.remote.exec(host, port, &command).await?;
                if output.exit_code != 0 {
                    return Err(RootDirError::RemoteRead {
                        host: host.to_string(),
                        path,
                        code: output.exit_code,
                    });
                }
                output.stdout
            }
            None => tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| RootDirError::Io { path: PathBuf::from(&path), source })?,
        };
        Ok(contents.trim().to_string())
    }
}

fn driver_field(
    container: &ContainerInfo,
    driver: &str,
    field: &'static str,
) -> Result<String, RootDirError> {
    container
        .driver_field(field)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| RootDirError::IncompleteMetadata { driver: driver.to_string(), field })
}

/// Parse `major.minor.patch` leniently: vendor builds report versions such
/// as `17.06.0-ce` or `19.03.30` that strict semver rejects.
fn parse_version(version: &str) -> Option<Version> {
    let core = version.trim().trim_start_matches('v');
    let core = core.split(['-', '+']).next()?;
    let mut parts = core.split('.').map(|p| p.parse::<u64>().ok());
    let major = parts.next()??;
    let minor = parts.next().flatten().unwrap_or(0);
    let patch = parts.next().flatten().unwrap_or(0);
    Some(Version::new(major, minor, patch))
}

/// Unparsable versions are treated as modern.
fn uses_layer_db(version: &str) -> bool {
    match parse_version(version) {
        Some(v) => v >= LAYER_DB_VERSION,
        None => {
            tracing::debug!(version, "unrecognised runtime version, assuming layer db");
            true
        }
    }
}

#[cfg(test)]
#[path = "rootdir_tests.rs"]
mod tests;
