use nexus_qa::config::{AppConfig, load_engine_settings};
use serial_test::serial;
use std::env;
use std::fs;

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    unsafe {
        env::remove_var("NEXUS_SERVER__PORT");
        env::remove_var("NEXUS_SERVER__HOST");
        env::remove_var("CONFIG_FILE");
        env::remove_var("PORT");
        env::remove_var("HOST");
        env::remove_var("GEMINI_API_KEY");
        env::remove_var("NEXUS_MODEL");
        env::remove_var("NEXUS_GEMINI_BASE_URL");
    }
}

#[test]
#[serial]
fn default_config_loads() {
    clear_env_vars();

    let config = AppConfig::load_from_args(["nexus-qa"]).expect("defaults should load");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.host, "127.0.0.1");
}

#[test]
#[serial]
fn env_overrides_port() {
    clear_env_vars();
    unsafe {
        env::set_var("NEXUS_SERVER__PORT", "9090");
    }

    let config = AppConfig::load_from_args(["nexus-qa"]).expect("Failed to load config");
    assert_eq!(config.server.port, 9090);

    clear_env_vars();
}

#[test]
#[serial]
fn cli_flag_wins_over_env() {
    clear_env_vars();
    unsafe {
        env::set_var("NEXUS_SERVER__PORT", "9090");
    }

    let config =
        AppConfig::load_from_args(["nexus-qa", "--port", "7070"]).expect("Failed to load config");
    assert_eq!(config.server.port, 7070);

    clear_env_vars();
}

#[test]
#[serial]
fn file_provides_values() {
    clear_env_vars();

    let config_content = "server:\n  port: 6060\n";
    let file_path = "test_config.yaml";
    fs::write(file_path, config_content).expect("Failed to write temp config");

    let config = AppConfig::load_from_args(["nexus-qa", "--config", file_path]);

    fs::remove_file(file_path).unwrap();

    assert_eq!(config.expect("Failed to load config from file").server.port, 6060);
}

#[test]
#[serial]
fn engine_settings_require_api_key() {
    clear_env_vars();

    let err = load_engine_settings().unwrap_err();
    assert!(err.contains("GEMINI_API_KEY"));
}

#[test]
#[serial]
fn engine_settings_apply_defaults_and_overrides() {
    clear_env_vars();
    unsafe {
        env::set_var("GEMINI_API_KEY", "test-key");
    }

    let settings = load_engine_settings().expect("settings should load");
    assert_eq!(settings.model, "gemini-3-flash-preview");
    assert!(settings.base_url.starts_with("https://generativelanguage.googleapis.com"));

    unsafe {
        env::set_var("NEXUS_MODEL", "gemini-2.5-flash");
    }
    let settings = load_engine_settings().expect("settings should load");
    assert_eq!(settings.model, "gemini-2.5-flash");

    clear_env_vars();
}
