// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Option validation that fails before any device is contacted.

use crate::prelude::*;

#[test]
fn missing_source_without_record_fails() {
    let project = Project::node();
    project.lp().args(&["push", DEVICE]).fails().code(1).stderr_has("missing required option: source");
}

#[test]
fn record_in_cwd_supplies_source_but_device_is_still_required() {
    let project = Project::node();
    project.file(".localpush.yml", "destination: /usr/src/app\n");
    project.lp().args(&["push"]).fails().code(1).stderr_has("missing required option: device");
}

#[test]
fn invalid_app_name_is_rejected() {
    let project = Project::node();
    project
        .lp()
        .args(&["push", DEVICE, "-s", ".", "--app-name", "My_App"])
        .fails()
        .stderr_has("invalid application name 'My_App'");
}

#[test]
fn app_name_may_not_end_with_dash() {
    let project = Project::node();
    project
        .lp()
        .args(&["push", DEVICE, "-s", ".", "-n", "my-app-"])
        .fails()
        .stderr_has("invalid application name");
}

#[test]
fn invalid_env_is_rejected() {
    let project = Project::node();
    project
        .lp()
        .args(&["push", DEVICE, "-s", ".", "-e", "GOOD=1", "-e", "1BAD=x"])
        .fails()
        .stderr_has("invalid environment variable '1BAD=x'");
}

#[test]
fn saved_environment_is_validated_too() {
    let project = Project::node();
    project.file(".localpush.yml", "local_device:\n  environment:\n    - NOT VALID\n");
    project
        .lp()
        .args(&["push", DEVICE])
        .fails()
        .stderr_has("invalid environment variable 'NOT VALID'");
}

#[test]
fn malformed_record_is_reported_with_its_path() {
    let project = Project::node();
    project.file(".localpush.yml", "- just\n- a list\n");
    project
        .lp()
        .args(&["push", DEVICE])
        .fails()
        .stderr_has(".localpush.yml")
        .stderr_has("top level must be a mapping");
}

#[test]
fn legacy_record_name_is_accepted() {
    let project = Project::node();
    project.file(".local-push.yml", "local_device:\n  app-name: Bad_Name\n");
    project.lp().args(&["push", DEVICE]).fails().stderr_has("invalid application name 'Bad_Name'");
}

#[test]
fn invalid_port_from_environment_is_a_usage_error() {
    let project = Project::node();
    project
        .lp()
        .env("LP_SSH_PORT", "not-a-port")
        .args(&["push", DEVICE, "-s", "."])
        .fails()
        .code(2)
        .stderr_has("--ssh-port");
}
