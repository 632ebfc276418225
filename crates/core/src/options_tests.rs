// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::trigger_set;

fn cli() -> CliOverrides {
    CliOverrides {
        device: Some("10.0.0.5".to_string()),
        source: Some(PathBuf::from("/work/app")),
        ..Default::default()
    }
}

#[test]
fn defaults_apply_without_record() {
    let options = PushOptions::resolve(cli(), &SyncConfig::default()).unwrap();
    assert_eq!(options.destination, DEFAULT_DESTINATION);
    assert_eq!(options.app_name.as_str(), DEFAULT_APP_NAME);
    assert_eq!(options.ignore, vec![".git", "node_modules/"]);
    assert_eq!(options.docker_port, 2375);
    assert_eq!(options.ssh_port, 22222);
    assert!(options.build_triggers.is_empty());
    assert!(!options.triggers_overridden);
}

#[test]
fn saved_record_beats_defaults() {
    let mut saved = SyncConfig {
        destination: Some("/opt/app".to_string()),
        before: Some("make".to_string()),
        ignore: Some(vec!["dist".to_string()]),
        ..Default::default()
    };
    saved.device.app_name = Some("saved-app".to_string());
    saved.device.build_triggers = trigger_set(&[("Dockerfile", "a"), ("requirements.txt", "b")]);
    saved.device.environment = Some(vec!["A=1".to_string()]);

    let options = PushOptions::resolve(cli(), &saved).unwrap();
    assert_eq!(options.destination, "/opt/app");
    assert_eq!(options.before.as_deref(), Some("make"));
    assert_eq!(options.ignore, vec!["dist"]);
    assert_eq!(options.app_name.as_str(), "saved-app");
    assert_eq!(options.build_triggers, vec!["Dockerfile", "requirements.txt"]);
    assert_eq!(options.saved_triggers.len(), 2);
    assert_eq!(options.env, vec!["A=1"]);
}

#[test]
fn flags_beat_saved_record() {
    let mut saved = SyncConfig { destination: Some("/opt/app".to_string()), ..Default::default() };
    saved.device.app_name = Some("saved-app".to_string());
    saved.device.build_triggers = trigger_set(&[("Dockerfile", "a")]);

    let overrides = CliOverrides {
        destination: Some("/srv".to_string()),
        app_name: Some("flag-app".to_string()),
        build_triggers: Some(vec!["Gemfile".to_string()]),
        ssh_port: Some(22),
        ..cli()
    };
    let options = PushOptions::resolve(overrides, &saved).unwrap();
    assert_eq!(options.destination, "/srv");
    assert_eq!(options.app_name.as_str(), "flag-app");
    assert_eq!(options.build_triggers, vec!["Gemfile"]);
    assert!(options.triggers_overridden);
    assert_eq!(options.saved_triggers.paths(), vec!["Dockerfile"]);
    assert_eq!(options.ssh_port, 22);
}

#[yare::parameterized(
    no_source = { CliOverrides { source: None, ..cli() }, ValidationError::MissingOption("source") },
    no_device = { CliOverrides { device: None, ..cli() }, ValidationError::MissingOption("device") },
    blank_device = { CliOverrides { device: Some("  ".to_string()), ..cli() }, ValidationError::MissingOption("device") },
    bad_name = { CliOverrides { app_name: Some("Bad_Name".to_string()), ..cli() }, ValidationError::InvalidAppName("Bad_Name".to_string()) },
    bad_env = { CliOverrides { env: Some(vec!["NOPE".to_string()]), ..cli() }, ValidationError::InvalidEnv("NOPE".to_string()) },
)]
fn resolve_rejects(overrides: CliOverrides, expected: ValidationError) {
    assert_eq!(PushOptions::resolve(overrides, &SyncConfig::default()).unwrap_err(), expected);
}

#[test]
fn saved_invalid_env_is_rejected() {
    let mut saved = SyncConfig::default();
    saved.device.environment = Some(vec!["1X=2".to_string()]);
    let err = PushOptions::resolve(cli(), &saved).unwrap_err();
    assert_eq!(err, ValidationError::InvalidEnv("1X=2".to_string()));
}

#[test]
fn record_settings_write_back() {
    let options = PushOptions::builder()
        .destination("/srv/app")
        .before(Some("echo hi".to_string()))
        .ignore(vec!["tmp".to_string()])
        .env(vec!["K=v".to_string()])
        .build();
    let mut config = SyncConfig::default();
    options.record_sync_settings(&mut config);
    options.record_build_settings(&mut config, trigger_set(&[("Dockerfile", "h")]));

    assert_eq!(config.destination.as_deref(), Some("/srv/app"));
    assert_eq!(config.before.as_deref(), Some("echo hi"));
    assert_eq!(config.after, None);
    assert_eq!(config.ignore, Some(vec!["tmp".to_string()]));
    assert_eq!(config.device.app_name.as_deref(), Some("local-app"));
    assert_eq!(config.device.build_triggers.hash_of("Dockerfile"), Some("h"));
    assert_eq!(config.device.environment, Some(vec!["K=v".to_string()]));
}
