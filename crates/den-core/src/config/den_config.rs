//! Top-level den configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{IndexConfig, StorageConfig};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`DEN_*`)
/// 3. Explicit config file passed to `load`
/// 4. User config (`~/.den/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DenConfig {
    pub storage: StorageConfig,
    pub index: IndexConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub database_path: Option<PathBuf>,
    pub batch_size: Option<usize>,
    pub progress_interval_ms: Option<u64>,
}

impl DenConfig {
    /// Load configuration with layered resolution.
    pub fn load(
        config_file: Option<&Path>,
        cli_overrides: Option<&CliOverrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // User config (lowest file priority). A broken user file is fatal,
        // an unreadable one is skipped.
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        ::tracing::warn!(error = %e, "skipping unreadable user config");
                    }
                }
            }
        }

        if let Some(path) = config_file {
            Self::merge_toml_file(&mut config, path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &DenConfig) -> Result<(), ConfigError> {
        let positive = [
            ("index.batch_size", config.index.batch_size),
            ("index.delete_chunk_size", config.index.delete_chunk_size),
            ("index.sniff_len", config.index.sniff_len),
            ("storage.read_pool_size", config.storage.read_pool_size),
        ];
        for (field, value) in positive {
            if value == Some(0) {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        if let Some(path) = &config.storage.database_path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "storage.database_path".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Returns the user config path: `~/.den/config.toml`.
    pub fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".den").join("config.toml"))
    }

    fn merge_toml_file(config: &mut DenConfig, path: &Path) -> Result<(), ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
                path: path.display().to_string(),
            })?;

        let file_config: DenConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; only `Some` values override.
    fn merge(base: &mut DenConfig, other: &DenConfig) {
        if other.storage.database_path.is_some() {
            base.storage.database_path = other.storage.database_path.clone();
        }
        if other.storage.read_pool_size.is_some() {
            base.storage.read_pool_size = other.storage.read_pool_size;
        }

        if other.index.batch_size.is_some() {
            base.index.batch_size = other.index.batch_size;
        }
        if other.index.delete_chunk_size.is_some() {
            base.index.delete_chunk_size = other.index.delete_chunk_size;
        }
        if other.index.progress_interval_ms.is_some() {
            base.index.progress_interval_ms = other.index.progress_interval_ms;
        }
        if other.index.sniff_len.is_some() {
            base.index.sniff_len = other.index.sniff_len;
        }
    }

    /// Pattern: `DEN_DATABASE_PATH`, `DEN_BATCH_SIZE`, etc.
    /// Values that fail to parse are ignored.
    fn apply_env_overrides(config: &mut DenConfig) {
        if let Some(val) = std::env::var_os("DEN_DATABASE_PATH") {
            if !val.is_empty() {
                config.storage.database_path = Some(PathBuf::from(val));
            }
        }
        if let Some(v) = env_parse::<usize>("DEN_READ_POOL_SIZE") {
            config.storage.read_pool_size = Some(v);
        }
        if let Some(v) = env_parse::<usize>("DEN_BATCH_SIZE") {
            config.index.batch_size = Some(v);
        }
        if let Some(v) = env_parse::<usize>("DEN_DELETE_CHUNK_SIZE") {
            config.index.delete_chunk_size = Some(v);
        }
        if let Some(v) = env_parse::<u64>("DEN_PROGRESS_INTERVAL_MS") {
            config.index.progress_interval_ms = Some(v);
        }
        if let Some(v) = env_parse::<usize>("DEN_SNIFF_LEN") {
            config.index.sniff_len = Some(v);
        }
    }

    fn apply_cli_overrides(config: &mut DenConfig, cli: &CliOverrides) {
        if let Some(ref v) = cli.database_path {
            config.storage.database_path = Some(v.clone());
        }
        if let Some(v) = cli.batch_size {
            config.index.batch_size = Some(v);
        }
        if let Some(v) = cli.progress_interval_ms {
            config.index.progress_interval_ms = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Cross-platform home directory resolution.
pub(crate) fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}
