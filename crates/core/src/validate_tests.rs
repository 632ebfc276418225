// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    simple = { "local-app", true },
    digits = { "app2", true },
    single = { "a", true },
    empty = { "", false },
    leading_dash = { "-app", false },
    trailing_dash = { "app-", false },
    uppercase = { "MyApp", false },
    underscore = { "my_app", false },
    space = { "my app", false },
)]
fn app_name(name: &str, ok: bool) {
    assert_eq!(AppName::parse(name).is_ok(), ok, "{name}");
}

#[test]
fn app_name_error_names_value() {
    let err = AppName::parse("Bad").unwrap_err();
    assert_eq!(err, ValidationError::InvalidAppName("Bad".to_string()));
    assert!(err.to_string().contains("'Bad'"));
}

#[yare::parameterized(
    plain = { "FOO=bar", true },
    empty_value = { "FOO=", true },
    underscore_start = { "_X=1", true },
    value_with_equals = { "URL=a=b", true },
    no_equals = { "FOO", false },
    digit_start = { "1FOO=bar", false },
    dash_in_name = { "MY-VAR=1", false },
    empty_name = { "=value", false },
)]
fn env_assignment(entry: &str, ok: bool) {
    assert_eq!(is_env_assignment(entry), ok, "{entry}");
}

#[test]
fn validate_env_reports_first_bad_entry() {
    let entries = vec!["A=1".to_string(), "bad".to_string(), "also bad".to_string()];
    assert_eq!(validate_env(&entries), Err(ValidationError::InvalidEnv("bad".to_string())));
    assert_eq!(validate_env(&[]), Ok(()));
}

mod props {
    use super::*;
    use crate::test_support::strategies::{arb_app_name, arb_env_entry};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn generated_names_parse(name in arb_app_name()) {
            let parsed = AppName::parse(&name).unwrap();
            prop_assert_eq!(parsed.as_str(), name.as_str());
        }

        #[test]
        fn generated_env_entries_validate(entries in proptest::collection::vec(arb_env_entry(), 0..8)) {
            prop_assert!(validate_env(&entries).is_ok());
        }
    }
}
