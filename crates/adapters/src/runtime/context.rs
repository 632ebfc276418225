// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

/// Pack `dir` into an in-memory tar archive rooted at `.`.
pub(crate) fn pack_directory(dir: &Path) -> std::io::Result<Vec<u8>> {
    let mut builder = tar::Builder::new(Vec::new());
    builder.follow_symlinks(false);
    builder.append_dir_all(".", dir)?;
    builder.into_inner()
}

/// Pack on the blocking pool; large projects take a while.
pub(crate) async fn pack_directory_async(dir: &Path) -> std::io::Result<Vec<u8>> {
    let dir = dir.to_path_buf();
    tokio::task::spawn_blocking(move || pack_directory(&dir))
        .await
        .map_err(std::io::Error::other)?
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
