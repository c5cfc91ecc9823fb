//! Tests for the den configuration system.

use std::path::PathBuf;
use std::sync::Mutex;

use den_core::config::{CliOverrides, DenConfig};
use den_core::errors::ConfigError;

/// Serializes tests that touch environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn tempdir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

fn clear_den_env_vars() {
    for key in [
        "DEN_DATABASE_PATH",
        "DEN_READ_POOL_SIZE",
        "DEN_BATCH_SIZE",
        "DEN_DELETE_CHUNK_SIZE",
        "DEN_PROGRESS_INTERVAL_MS",
        "DEN_SNIFF_LEN",
    ] {
        std::env::remove_var(key);
    }
}

/// Points HOME at an empty directory so a real user config cannot leak in.
fn isolated_home() -> tempfile::TempDir {
    let home = tempdir();
    std::env::set_var("HOME", home.path());
    home
}

#[test]
fn defaults_match_batching_policy() {
    let config = DenConfig::default();
    assert_eq!(config.index.effective_batch_size(), 1_000);
    assert_eq!(config.index.effective_delete_chunk_size(), 1_000);
    assert_eq!(config.index.effective_progress_interval().as_millis(), 1_000);
    assert_eq!(config.index.effective_sniff_len(), 512);
    assert_eq!(config.storage.effective_read_pool_size(), 4);
}

#[test]
fn layered_resolution_cli_over_env_over_file_over_user() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_den_env_vars();
    let home = isolated_home();

    let user_dir = home.path().join(".den");
    std::fs::create_dir_all(&user_dir).unwrap();
    std::fs::write(
        user_dir.join("config.toml"),
        "[index]\nbatch_size = 10\nsniff_len = 64\ndelete_chunk_size = 7\n",
    )
    .unwrap();

    let dir = tempdir();
    let file = dir.path().join("den.toml");
    std::fs::write(&file, "[index]\nbatch_size = 20\nsniff_len = 128\n").unwrap();

    std::env::set_var("DEN_BATCH_SIZE", "30");

    let cli = CliOverrides {
        database_path: Some(PathBuf::from("/tmp/cli.sqlite3")),
        ..Default::default()
    };
    let config = DenConfig::load(Some(&file), Some(&cli)).unwrap();

    assert_eq!(config.index.effective_delete_chunk_size(), 7); // user
    assert_eq!(config.index.effective_sniff_len(), 128); // file
    assert_eq!(config.index.effective_batch_size(), 30); // env
    assert_eq!(
        config.storage.effective_database_path(),
        Some(PathBuf::from("/tmp/cli.sqlite3"))
    );

    clear_den_env_vars();
}

#[test]
fn default_database_path_lives_under_home() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_den_env_vars();
    let home = isolated_home();

    let config = DenConfig::load(None, None).unwrap();
    assert_eq!(
        config.storage.effective_database_path(),
        Some(home.path().join(".local/share/den/db.sqlite3"))
    );
}

#[test]
fn unparsable_env_value_is_ignored() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_den_env_vars();
    let _home = isolated_home();

    std::env::set_var("DEN_BATCH_SIZE", "lots");
    let config = DenConfig::load(None, None).unwrap();
    assert_eq!(config.index.effective_batch_size(), 1_000);
    clear_den_env_vars();
}

#[test]
fn zero_batch_size_is_rejected() {
    let config = DenConfig::from_toml("[index]\nbatch_size = 0\n").unwrap();
    let err = DenConfig::validate(&config).unwrap_err();
    match err {
        ConfigError::ValidationFailed { field, .. } => assert_eq!(field, "index.batch_size"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn invalid_toml_reports_parse_error() {
    let err = DenConfig::from_toml("[index\nbatch_size = ").unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn missing_explicit_file_is_an_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_den_env_vars();
    let _home = isolated_home();

    let dir = tempdir();
    let err = DenConfig::load(Some(&dir.path().join("absent.toml")), None).unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound { .. }));
}

#[test]
fn toml_roundtrip_keeps_values() {
    let config = DenConfig::from_toml(
        "[storage]\ndatabase_path = \"/var/den.db\"\n[index]\nprogress_interval_ms = 250\n",
    )
    .unwrap();
    let text = config.to_toml().unwrap();
    let again = DenConfig::from_toml(&text).unwrap();
    assert_eq!(again.index.effective_progress_interval().as_millis(), 250);
    assert_eq!(
        again.storage.database_path,
        Some(PathBuf::from("/var/den.db"))
    );
}
