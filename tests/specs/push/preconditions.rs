// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Project preconditions checked before the device is contacted.

use crate::prelude::*;

#[test]
fn missing_dockerfile_fails_without_writing_record() {
    let project = Project::empty();
    project.file("package.json", "{}\n");
    project
        .lp()
        .args(&["push", DEVICE, "-s", ".", "--skip-logs"])
        .fails()
        .code(1)
        .stderr_has("no Dockerfile found");
    assert!(!project.join(".localpush.yml").exists());
}

#[test]
fn dockerfile_template_gets_dedicated_message() {
    let project = Project::empty();
    project.file("Dockerfile.template", "FROM balenalib/%%BALENA_MACHINE_NAME%%-node\n");
    project
        .lp()
        .args(&["push", DEVICE, "-s", "."])
        .fails()
        .stderr_has("Dockerfile.template")
        .stderr_has("templates are not supported")
        .stderr_lacks("no Dockerfile found");
}

#[test]
fn source_flag_is_resolved_from_cwd() {
    let project = Project::empty();
    project.file("app/Dockerfile.template", "FROM alpine\n");
    project.lp().args(&["push", DEVICE, "--source", "app"]).fails().stderr_has("app");
}
