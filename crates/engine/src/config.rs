// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine configuration loaded from TOML

use cis_storage::{StoreError, WalStore};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level engine configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// WAL file for the job store; absent keeps everything in memory
    pub wal_path: Option<PathBuf>,
    pub hook: HookConfig,
}

/// Delivery policy for the success hook
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HookConfig {
    /// Total attempts per notification, including the first
    pub max_attempts: u32,
    /// Fixed pause between attempts
    #[serde(with = "humantime_serde")]
    pub backoff: Duration,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_secs(2),
        }
    }
}

impl EngineConfig {
    /// Load and validate configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// Parse and validate configuration from TOML content
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hook.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "hook.max_attempts must be at least 1".to_string(),
            ));
        }
        if matches!(&self.wal_path, Some(path) if path.as_os_str().is_empty()) {
            return Err(ConfigError::Invalid("wal_path must not be empty".to_string()));
        }
        Ok(())
    }

    /// Open the configured store, replaying the WAL if one is set
    pub fn open_store(&self) -> Result<WalStore, StoreError> {
        match &self.wal_path {
            Some(path) => WalStore::open(path),
            None => Ok(WalStore::in_memory()),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
