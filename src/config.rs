/*
 * aurpc - Typed client for the Arch User Repository RPC interface.
 * Copyright (C) 2025  compiledkernel-idk and pacboost contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

//! Configuration management with validation and defaults.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::aur::client::{normalize_base_url, DEFAULT_RPC_URL};
use crate::aur::transport::DEFAULT_USER_AGENT;
use crate::error::{AurError, AurResult};

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// AUR RPC endpoint
    pub rpc_url: String,

    /// User-Agent sent by the HTTP transport
    pub user_agent: String,

    /// Whole-request timeout in seconds (0 = none)
    pub timeout_secs: u64,

    /// Connect timeout in seconds (0 = none)
    pub connect_timeout_secs: u64,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 0,
            connect_timeout_secs: 0,
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log file path (empty = no file logging)
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from multiple sources with precedence:
    /// 1. /etc/aurpc/aurpc.toml (system-wide)
    /// 2. ~/.config/aurpc/config.toml (user)
    /// 3. Environment variables (AURPC_*)
    pub fn load() -> Self {
        let mut config = Config::default();

        // Unreadable or invalid files are skipped
        if let Ok(parsed) = Self::from_file(Path::new("/etc/aurpc/aurpc.toml")) {
            config = config.merge(parsed);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("aurpc").join("config.toml");
            if let Ok(parsed) = Self::from_file(&user_config) {
                config = config.merge(parsed);
            }
        }

        config.apply_env_overrides(|key| std::env::var(key).ok())
    }

    /// Parse a single TOML file
    pub fn from_file(path: &Path) -> AurResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| AurError::Config {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&content).map_err(|e| AurError::Config {
            message: format!("{}: {}", path.display(), e),
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Merge another config into this one (other takes precedence for non-default values)
    fn merge(mut self, other: Config) -> Self {
        let default = Config::default();

        if other.rpc_url != default.rpc_url {
            self.rpc_url = other.rpc_url;
        }
        if other.user_agent != default.user_agent {
            self.user_agent = other.user_agent;
        }
        if other.timeout_secs != default.timeout_secs {
            self.timeout_secs = other.timeout_secs;
        }
        if other.connect_timeout_secs != default.connect_timeout_secs {
            self.connect_timeout_secs = other.connect_timeout_secs;
        }
        if other.logging.level != default.logging.level {
            self.logging.level = other.logging.level;
        }
        if other.logging.file.is_some() {
            self.logging.file = other.logging.file;
        }

        self
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(val) = var("AURPC_RPC_URL") {
            self.rpc_url = val;
        }

        if let Some(val) = var("AURPC_USER_AGENT") {
            self.user_agent = val;
        }

        if let Some(val) = var("AURPC_TIMEOUT") {
            if let Ok(n) = val.parse() {
                self.timeout_secs = n;
            }
        }

        if let Some(val) = var("AURPC_LOG_LEVEL") {
            self.logging.level = val;
        }

        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> AurResult<()> {
        normalize_base_url(&self.rpc_url)?;
        if self.user_agent.trim().is_empty() {
            return Err(AurError::Config {
                message: "user_agent must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
