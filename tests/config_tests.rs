//! Configuration tests
//!
//! Layering of defaults, config files and `REFBRIDGE_*` environment variables, plus the
//! validation errors a misconfigured endpoint produces.
//!
//! Uses temp-env to manage environment variables, restoring them after each test.

use std::fs;

use refbridge::config::loader::ConfigLoader;
use refbridge::config::validation::ConfigValidator;
use refbridge::config::{Config, EndpointConfig, LogLevel};
use temp_env::with_vars;
use tempfile::TempDir;

const ENDPOINT_VARS: [&str; 6] = [
    "REFBRIDGE_BASE_URL",
    "REFBRIDGE_MODEL",
    "REFBRIDGE_API_KEY",
    "REFBRIDGE_STREAM",
    "REFBRIDGE_TIMEOUT_SECS",
    "REFBRIDGE_LOG_LEVEL",
];

/// Run `f` with every endpoint variable unset except the given overrides
fn with_clean_env<F: FnOnce()>(overrides: &[(&str, &str)], f: F) {
    let vars: Vec<(&str, Option<&str>)> = ENDPOINT_VARS
        .iter()
        .map(|name| {
            let value = overrides.iter().find(|(key, _)| key == name).map(|(_, v)| *v);
            (*name, value)
        })
        .collect();
    with_vars(vars, f);
}

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_defaults_target_local_ollama() {
    let config = Config::default();
    assert_eq!(config.endpoint.base_url, "http://localhost:11434/v1");
    assert_eq!(config.endpoint.model, "gemma:2b");
    assert_eq!(config.endpoint.api_key, "ollama");
    assert!(!config.endpoint.stream);
    assert_eq!(config.endpoint.timeout_secs, 300);
    assert_eq!(config.logging.level, LogLevel::Info);
    assert_eq!(config.endpoint.completions_url(), "http://localhost:11434/v1/chat/completions");
}

#[test]
fn test_file_then_env_layering() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[endpoint]
base_url = "http://gpu-box:8000/v1"
model = "llama3:8b"
stream = true
"#,
    );

    with_clean_env(&[("REFBRIDGE_MODEL", "phi3:mini")], || {
        let config = ConfigLoader::new()
            .with_defaults()
            .with_config_file(&path)
            .unwrap()
            .with_env_vars()
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.endpoint.base_url, "http://gpu-box:8000/v1");
        assert_eq!(config.endpoint.model, "phi3:mini");
        assert!(config.endpoint.stream);
        assert_eq!(config.endpoint.api_key, "ollama");
        assert_eq!(config.endpoint.timeout_secs, 300);
    });
}

#[test]
fn test_env_config_file_is_loaded() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[endpoint]
timeout_secs = 30

[logging]
level = "debug"
"#,
    );
    let path_str = path.to_string_lossy().to_string();

    with_clean_env(&[], || {
        temp_env::with_var("REFBRIDGE_CONFIG", Some(path_str.as_str()), || {
            let config = ConfigLoader::new()
                .with_defaults()
                .with_env_config_file()
                .unwrap()
                .build()
                .unwrap();

            assert_eq!(config.endpoint.timeout_secs, 30);
            assert_eq!(config.logging.level, LogLevel::Debug);
        });
    });
}

#[test]
fn test_missing_env_config_file_is_an_error() {
    temp_env::with_var("REFBRIDGE_CONFIG", Some("/nonexistent/refbridge/config.toml"), || {
        let result = ConfigLoader::new().with_defaults().with_env_config_file();
        assert!(result.is_err(), "Missing explicit config file should fail");
    });
}

#[test]
fn test_unknown_keys_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[endpoint]
base_url = "http://localhost:11434/v1"
temperature = 0.2
"#,
    );

    let result = ConfigLoader::new().with_defaults().with_config_file(&path);
    assert!(result.is_err(), "Unknown config keys should be rejected");
}

#[test]
fn test_invalid_env_values() {
    with_clean_env(&[("REFBRIDGE_TIMEOUT_SECS", "forever")], || {
        let result = ConfigLoader::new().with_defaults().with_env_vars();
        let err = result.err().expect("Invalid timeout should fail");
        assert!(format!("{}", err).contains("REFBRIDGE_TIMEOUT_SECS"));
    });

    with_clean_env(&[("REFBRIDGE_LOG_LEVEL", "loud")], || {
        let result = ConfigLoader::new().with_defaults().with_env_vars();
        assert!(result.is_err(), "Invalid log level should fail");
    });
}

#[test]
fn test_build_rejects_bad_endpoint() {
    with_clean_env(&[("REFBRIDGE_BASE_URL", "localhost:11434/v1"), ("REFBRIDGE_MODEL", " ")], || {
        let err = ConfigLoader::new()
            .with_defaults()
            .with_env_vars()
            .unwrap()
            .build()
            .err()
            .expect("Invalid endpoint should fail validation");

        let msg = format!("{}", err);
        assert!(msg.contains("2 error(s)"), "got: {}", msg);
        assert!(msg.contains("endpoint.base_url"));
        assert!(msg.contains("endpoint.model"));
    });
}

#[test]
fn test_zero_timeout_is_invalid() {
    let config = Config {
        endpoint: EndpointConfig { timeout_secs: 0, ..EndpointConfig::default() },
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_warnings_do_not_fail_validation() {
    let config = Config {
        endpoint: EndpointConfig {
            base_url: "http://localhost:11434/v1/chat/completions".to_string(),
            api_key: String::new(),
            ..EndpointConfig::default()
        },
        ..Config::default()
    };

    assert!(config.validate().is_ok());
    let warnings = ConfigValidator::new(&config).warnings();
    assert!(warnings.iter().any(|w| w.contains("/chat/completions")));
    assert!(warnings.iter().any(|w| w.contains("api_key")));
}

#[test]
fn test_example_toml_parses_to_defaults() {
    let config: Config = toml::from_str(Config::example_toml()).unwrap();
    assert_eq!(config, Config::default());
}
