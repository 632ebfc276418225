// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Content fingerprints of build trigger files.

use futures_util::future::try_join_all;
use lp_core::{TriggerFile, TriggerSet, IMPLICIT_TRIGGERS};
use sha2::{Digest, Sha256, Sha512};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tokio::io::AsyncReadExt;

const READ_CHUNK: usize = 64 * 1024;

#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("build trigger file not found: {0}")]
    MissingFile(String),
    #[error("failed to hash {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Sha512,
}

/// SHA-256 hex digest of a file, streamed in chunks.
pub async fn hash_file(path: &Path) -> Result<String, TriggerError> {
    hash_file_with(path, HashAlgorithm::Sha256).await
}

pub async fn hash_file_with(path: &Path, algorithm: HashAlgorithm) -> Result<String, TriggerError> {
    match algorithm {
        HashAlgorithm::Sha256 => digest_file::<Sha256>(path).await,
        HashAlgorithm::Sha512 => digest_file::<Sha512>(path).await,
    }
}

async fn digest_file<D: Digest>(path: &Path) -> Result<String, TriggerError>
where
    sha2::digest::Output<D>: std::fmt::LowerHex,
{
    let io_err = |source| TriggerError::Io { path: path.to_path_buf(), source };
    let mut file = tokio::fs::File::open(path).await.map_err(io_err)?;
    let mut hasher = D::new();
    let mut buf = vec![0u8; READ_CHUNK];
    loop {
        let n = file.read(&mut buf).await.map_err(io_err)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Resolve `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let at_parent = matches!(out.components().next_back(), Some(Component::ParentDir));
                if at_parent || !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// `path` relative to `base`; both must already be normalized.
fn relative_to(path: &Path, base: &Path) -> String {
    if let Ok(rest) = path.strip_prefix(base) {
        return rest.to_string_lossy().into_owned();
    }
    let path_parts: Vec<Component> = path.components().collect();
    let base_parts: Vec<Component> = base.components().collect();
    let common = path_parts.iter().zip(&base_parts).take_while(|(a, b)| a == b).count();
    let mut out = PathBuf::new();
    for _ in common..base_parts.len() {
        out.push("..");
    }
    for part in &path_parts[common..] {
        out.push(part.as_os_str());
    }
    out.to_string_lossy().into_owned()
}

/// Hash the user's trigger files plus the implicit ones.
///
/// Entries are trimmed, blank ones dropped, and spellings that resolve to
/// the same file collapse into one entry. Missing files are skipped when
/// `skip_missing` is set, otherwise the first one is an error. Files are
/// hashed concurrently; the result keeps the order of the filtered list.
pub async fn build_trigger_set(
    files: &[String],
    base_dir: &Path,
    skip_missing: bool,
) -> Result<TriggerSet, TriggerError> {
    let base = normalize(base_dir);
    let mut resolved: Vec<PathBuf> = Vec::new();
    for name in files.iter().map(String::as_str).chain(IMPLICIT_TRIGGERS.iter().copied()) {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let abs = normalize(&base.join(name));
        if !resolved.contains(&abs) {
            resolved.push(abs);
        }
    }

    let mut present: Vec<(String, PathBuf)> = Vec::with_capacity(resolved.len());
    for abs in resolved {
        let rel = relative_to(&abs, &base);
        if tokio::fs::try_exists(&abs).await.unwrap_or(false) {
            present.push((rel, abs));
        } else if skip_missing {
            tracing::debug!(file = %rel, "skipping missing build trigger");
        } else {
            return Err(TriggerError::MissingFile(rel));
        }
    }

    let entries = try_join_all(present.into_iter().map(|(rel, abs)| async move {
        let hash = hash_file(&abs).await?;
        Ok::<_, TriggerError>(TriggerFile::new(rel, hash))
    }))
    .await?;
    Ok(TriggerSet::new(entries))
}

/// Whether any stored trigger file was deleted or changed.
///
/// An empty set is unchanged. Errors other than a missing file also count
/// as changed.
pub async fn check_triggers(triggers: &TriggerSet, base_dir: &Path) -> bool {
    if triggers.is_empty() {
        return false;
    }
    match compare_triggers(triggers, base_dir).await {
        Ok(changed) => changed,
        Err(e) => {
            tracing::warn!(error = %e, "could not verify build triggers, assuming changed");
            true
        }
    }
}

async fn compare_triggers(triggers: &TriggerSet, base_dir: &Path) -> Result<bool, TriggerError> {
    let base = normalize(base_dir);
    for entry in triggers.iter() {
        let abs = normalize(&base.join(&entry.path));
        let exists = tokio::fs::try_exists(&abs)
            .await
            .map_err(|source| TriggerError::Io { path: abs.clone(), source })?;
        if !exists {
            tracing::info!(file = %entry.path, "build trigger removed");
            return Ok(true);
        }
        if hash_file(&abs).await? != entry.hash {
            tracing::info!(file = %entry.path, "build trigger changed");
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
#[path = "triggers_tests.rs"]
mod tests;
