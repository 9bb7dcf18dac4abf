//! Integration tests for configuration loading and validation
//!
//! Note: Tests that modify environment variables hold ENV_MUTEX so they do
//! not interfere with each other.

use logscrub::config::{load_config, load_or_default};
use logscrub::domain::ScrubError;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("LOGSCRUB_APPLICATION_LOG_LEVEL");
    std::env::remove_var("LOGSCRUB_ANONYMIZATION_PATTERN_TABLE");
    std::env::remove_var("LOGSCRUB_ANONYMIZATION_TOKEN_LENGTH");
    std::env::remove_var("LOGSCRUB_ANONYMIZATION_IPV4_EXEMPT_PREFIXES");
    std::env::remove_var("LOGSCRUB_PROCESSING_PARALLEL_FILES");
    std::env::remove_var("LOGSCRUB_PROCESSING_FILE_EXTENSION");
    std::env::remove_var("TEST_PATTERN_DIR");
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config(
        r#"
[application]
log_level = "debug"

[anonymization]
pattern_table = "conf/patterns.json"
token_length = 16
ipv4_exempt_prefixes = ["7.", "8.", "9."]

[anonymization.audit]
enabled = true
log_path = "/tmp/logscrub-audit.log"
json_format = false

[processing]
file_extension = "txt"
parallel_files = 4
dictionary_prefix = "mapping"

[logging]
local_enabled = false
local_path = "/tmp/logscrub"
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.anonymization.pattern_table, PathBuf::from("conf/patterns.json"));
    assert_eq!(config.anonymization.token_length, 16);
    assert_eq!(config.anonymization.ipv4_exempt_prefixes, vec!["7.", "8.", "9."]);
    assert!(config.anonymization.audit.enabled);
    assert!(!config.anonymization.audit.json_format);
    assert_eq!(config.processing.file_extension, "txt");
    assert_eq!(config.processing.parallel_files, 4);
    assert_eq!(config.processing.dictionary_prefix, "mapping");
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_empty_config_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config("");
    let config = load_config(file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "info");
    assert_eq!(config.anonymization.token_length, 12);
    assert_eq!(config.anonymization.ipv4_exempt_prefixes, vec!["7.", "8."]);
    assert_eq!(config.processing.file_extension, "log");
    assert_eq!(config.processing.parallel_files, 1);
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("TEST_PATTERN_DIR", "/etc/logscrub");

    let file = write_config(
        r#"
# Pattern table lives in ${TEST_PATTERN_DIR}
[anonymization]
pattern_table = "${TEST_PATTERN_DIR}/patterns.toml"
"#,
    );

    let config = load_config(file.path()).expect("Failed to load config");
    assert_eq!(
        config.anonymization.pattern_table,
        PathBuf::from("/etc/logscrub/patterns.toml")
    );

    cleanup_env_vars();
}

#[test]
fn test_missing_env_var_is_configuration_error() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config(
        r#"
[anonymization]
pattern_table = "${LOGSCRUB_TEST_UNSET_DIR}/patterns.toml"
"#,
    );

    let err = load_config(file.path()).unwrap_err();
    assert!(matches!(err, ScrubError::Configuration(_)));
    assert!(err.to_string().contains("LOGSCRUB_TEST_UNSET_DIR"));
}

#[test]
fn test_env_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("LOGSCRUB_APPLICATION_LOG_LEVEL", "warn");
    std::env::set_var("LOGSCRUB_ANONYMIZATION_TOKEN_LENGTH", "20");
    std::env::set_var("LOGSCRUB_ANONYMIZATION_IPV4_EXEMPT_PREFIXES", "7., 10.");
    std::env::set_var("LOGSCRUB_PROCESSING_PARALLEL_FILES", "8");

    let file = write_config("[application]\nlog_level = \"info\"\n");
    let config = load_config(file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "warn");
    assert_eq!(config.anonymization.token_length, 20);
    assert_eq!(config.anonymization.ipv4_exempt_prefixes, vec!["7.", "10."]);
    assert_eq!(config.processing.parallel_files, 8);

    cleanup_env_vars();
}

#[test]
fn test_invalid_override_fails_validation() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("LOGSCRUB_PROCESSING_PARALLEL_FILES", "0");

    let result = load_or_default(None);
    assert!(matches!(result, Err(ScrubError::Configuration(_))));

    cleanup_env_vars();
}

#[test]
fn test_invalid_values_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    for content in [
        "[application]\nlog_level = \"verbose\"\n",
        "[anonymization]\ntoken_length = 2\n",
        "[anonymization]\npattern_table = \"patterns.yaml\"\n",
        "[processing]\nfile_extension = \".log\"\n",
        "[logging]\nlocal_rotation = \"weekly\"\n",
    ] {
        let file = write_config(content);
        let result = load_config(file.path());
        assert!(
            matches!(result, Err(ScrubError::Configuration(_))),
            "accepted invalid config: {content}"
        );
    }
}

#[test]
fn test_missing_config_file() {
    let result = load_config("/nonexistent/logscrub.toml");
    assert!(matches!(result, Err(ScrubError::Configuration(_))));
    assert_eq!(result.unwrap_err().exit_code(), 2);
}
