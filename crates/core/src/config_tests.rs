// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::trigger_set;

const SAMPLE: &str = r#"
destination: /usr/src/app
before: echo hello
after: echo done
ignore:
  - .git
  - node_modules/
local_device:
  app-name: my-app
  build-triggers:
    - Dockerfile: f6aca399ab7883e1ebdf61b6d22756df83626409f824c0f6d80c2148478769b2
    - package.json: e2c193459707068888808a4e89c745162ed4e24bc093ac72f0009f5f15992cbb
  environment:
    - FOO=bar
"#;

#[test]
fn parses_full_record() {
    let config = SyncConfig::from_yaml(SAMPLE, CONFIG_FILE).unwrap();
    assert_eq!(config.destination.as_deref(), Some("/usr/src/app"));
    assert_eq!(config.before.as_deref(), Some("echo hello"));
    assert_eq!(config.after.as_deref(), Some("echo done"));
    assert_eq!(config.ignore, Some(vec![".git".to_string(), "node_modules/".to_string()]));
    assert_eq!(config.device.app_name.as_deref(), Some("my-app"));
    assert_eq!(config.device.build_triggers.paths(), vec!["Dockerfile", "package.json"]);
    assert_eq!(config.device.environment, Some(vec!["FOO=bar".to_string()]));
}

#[test]
fn empty_document_is_default() {
    let config = SyncConfig::from_yaml("", CONFIG_FILE).unwrap();
    assert_eq!(config, SyncConfig::default());
}

#[yare::parameterized(
    scalar = { "just a string" },
    list = { "- a\n- b\n" },
)]
fn non_mapping_is_rejected(contents: &str) {
    let err = SyncConfig::from_yaml(contents, "/p/.localpush.yml").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)), "{err:?}");
}

#[test]
fn malformed_yaml_is_parse_error() {
    let err = SyncConfig::from_yaml("destination: [unclosed", CONFIG_FILE).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn unknown_keys_survive_round_trip() {
    let contents = "destination: /app\ncustom: 42\nlocal_device:\n  app-name: a\n  note: keep\n";
    let config = SyncConfig::from_yaml(contents, CONFIG_FILE).unwrap();
    let written = config.to_yaml().unwrap();
    let reread = SyncConfig::from_yaml(&written, CONFIG_FILE).unwrap();
    assert_eq!(reread, config);
    assert!(written.contains("custom: 42"));
    assert!(written.contains("note: keep"));
}

#[test]
fn empty_sections_are_not_written() {
    let config = SyncConfig { destination: Some("/app".to_string()), ..Default::default() };
    assert_eq!(config.to_yaml().unwrap(), "destination: /app\n");
}

#[test]
fn triggers_written_as_single_entry_maps() {
    let mut config = SyncConfig::default();
    config.device.build_triggers = trigger_set(&[("Dockerfile", "abc")]);
    let written = config.to_yaml().unwrap();
    assert!(written.contains("- Dockerfile: abc"), "{written}");
    let reread = SyncConfig::from_yaml(&written, CONFIG_FILE).unwrap();
    assert_eq!(reread.device.build_triggers.hash_of("Dockerfile"), Some("abc"));
}
