// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Help and version output.

use crate::prelude::*;

#[test]
fn no_args_prints_usage_and_fails() {
    cli().fails().code(2).stderr_has("Usage:");
}

#[test]
fn help_lists_push() {
    cli().args(&["--help"]).passes().stdout_has("Usage:").stdout_has("push");
}

#[test]
fn push_help_lists_options() {
    cli()
        .args(&["push", "--help"])
        .passes()
        .stdout_has("--build-triggers")
        .stdout_has("--skip-logs")
        .stdout_has("--skip-gitignore")
        .stdout_has("LP_DOCKER_PORT");
}

#[test]
fn version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("lp 0.2");
}
