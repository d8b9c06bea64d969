mod common;

use clap::Parser;
use common::config_test_utils::with_config_env;
use ruff::common::config::{load_config, CliArgs};
use ruff::common::AppConfig;

#[test]
fn defaults_without_file_env_or_flags() {
    with_config_env("", || {
        let config = load_config(&CliArgs::default()).expect("load config");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.count, 1);
        assert_eq!(config.port, 8008);
        assert!(!config.hide_qr);
        assert!(config.multiple);
    });
}

#[test]
fn precedence_defaults_file_env_cli() {
    with_config_env(
        r#"
        port = 1111
        "#,
        || {
            std::env::set_var("RUFF_PORT", "2222");

            let cli = CliArgs::try_parse_from(["ruff", "-p", "3333", "cat.jpg"]).unwrap();
            let config = load_config(&cli).expect("load config");
            assert_eq!(config.port, 3333);
        },
    );
}

#[test]
fn precedence_defaults_file_env_without_cli() {
    with_config_env(
        r#"
        port = 1111
        "#,
        || {
            std::env::set_var("RUFF_PORT", "2222");

            let config = load_config(&CliArgs::default()).expect("load config");
            assert_eq!(config.port, 2222);
        },
    );
}

#[test]
fn config_file_overrides_defaults() {
    with_config_env(
        r#"
        count = 5
        hide_qr = true
        multiple = false
        "#,
        || {
            let config = load_config(&CliArgs::default()).expect("load config");
            assert_eq!(config.count, 5);
            assert!(config.hide_qr);
            assert!(!config.multiple);
            assert_eq!(config.port, 8008);
        },
    );
}

#[test]
fn unset_cli_flags_do_not_mask_file_values() {
    with_config_env(
        r#"
        hide_qr = true
        multiple = false
        "#,
        || {
            let cli = CliArgs::try_parse_from(["ruff", "-u"]).unwrap();
            let config = load_config(&cli).expect("load config");
            assert!(config.hide_qr);
            assert!(!config.multiple);
        },
    );
}

#[test]
fn cli_can_turn_multiple_back_on() {
    with_config_env(
        r#"
        multiple = false
        "#,
        || {
            let cli = CliArgs::try_parse_from(["ruff", "-u", "-m"]).unwrap();
            let config = load_config(&cli).expect("load config");
            assert!(config.multiple);
        },
    );
}

#[test]
fn unlimited_count_from_env() {
    with_config_env("", || {
        std::env::set_var("RUFF_COUNT", "-1");

        let config = load_config(&CliArgs::default()).expect("load config");
        assert_eq!(config.count, -1);
    });
}
