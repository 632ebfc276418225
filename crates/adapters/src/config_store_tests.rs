// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use lp_core::test_support::trigger_set;

#[test]
fn missing_record_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = YamlConfigStore::new();
    assert!(!store.exists(dir.path()));
    assert_eq!(store.load(dir.path()).unwrap(), SyncConfig::default());
}

#[test]
fn save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let store = YamlConfigStore::new();
    let mut config = SyncConfig { destination: Some("/srv".to_string()), ..Default::default() };
    config.device.build_triggers = trigger_set(&[("Dockerfile", "abc")]);

    store.save(dir.path(), &config).unwrap();
    assert!(dir.path().join(CONFIG_FILE).is_file());
    assert!(!dir.path().join(format!("{CONFIG_FILE}.tmp")).exists());
    assert_eq!(store.load(dir.path()).unwrap(), config);
}

#[test]
fn legacy_file_is_read_and_new_name_written() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(LEGACY_CONFIG_FILE), "destination: /legacy\n").unwrap();
    let store = YamlConfigStore::new();
    assert!(store.exists(dir.path()));

    let config = store.load(dir.path()).unwrap();
    assert_eq!(config.destination.as_deref(), Some("/legacy"));

    store.save(dir.path(), &config).unwrap();
    assert!(dir.path().join(CONFIG_FILE).is_file());
}

#[test]
fn current_name_wins_over_legacy() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(LEGACY_CONFIG_FILE), "destination: /legacy\n").unwrap();
    std::fs::write(dir.path().join(CONFIG_FILE), "destination: /current\n").unwrap();
    let config = YamlConfigStore::new().load(dir.path()).unwrap();
    assert_eq!(config.destination.as_deref(), Some("/current"));
}

#[test]
fn invalid_record_is_reported_with_path() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(CONFIG_FILE), "- not\n- a mapping\n").unwrap();
    let err = YamlConfigStore::new().load(dir.path()).unwrap_err();
    assert!(err.to_string().contains(CONFIG_FILE), "{err}");
}

#[test]
fn fake_store_keeps_history() {
    let store = FakeConfigStore::new();
    let dir = Path::new("/p");
    store.save(dir, &SyncConfig { destination: Some("/a".into()), ..Default::default() }).unwrap();
    store.save(dir, &SyncConfig { destination: Some("/b".into()), ..Default::default() }).unwrap();
    assert_eq!(store.saves().len(), 2);
    assert_eq!(store.load(dir).unwrap().destination.as_deref(), Some("/b"));
}
