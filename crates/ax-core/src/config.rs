//! Configuration for ax.
//!
//! Settings live in `config.toml` under the platform config directory
//! (overridable with `AX_CONFIG_DIR`). Every section is optional; missing
//! keys take their defaults. `AX_CACHE_DIR` overrides the cache root after
//! the file is read.
//!
//! ```toml
//! [paths]
//! cache_root = "/var/cache/ax"
//!
//! [fetch]
//! timeout_secs = 30
//! head_timeout_secs = 10
//!
//! [search]
//! default_limit = 10
//! max_content_length = 500
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, SearchOptions};

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "AX_CONFIG_DIR";
/// Environment variable overriding the cache root.
pub const CACHE_DIR_ENV: &str = "AX_CACHE_DIR";

const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `[paths]`
    pub paths: PathsConfig,
    /// `[fetch]`
    pub fetch: FetchConfig,
    /// `[search]`
    pub search: SearchConfig,
}

/// Filesystem locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding every corpus's metadata file and index.
    pub cache_root: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            cache_root: directories::BaseDirs::new().map_or_else(
                || PathBuf::from(".ax-cache"),
                |base| base.cache_dir().join("ax"),
            ),
        }
    }
}

/// HTTP timeouts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// GET timeout in seconds.
    pub timeout_secs: u64,
    /// HEAD timeout in seconds.
    pub head_timeout_secs: u64,
}

impl FetchConfig {
    /// Timeout for full downloads.
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Timeout for conditional HEAD checks.
    pub const fn head_timeout(&self) -> Duration {
        Duration::from_secs(self.head_timeout_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            head_timeout_secs: 10,
        }
    }
}

/// Search defaults applied when a caller passes zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Results returned when no limit is given.
    pub default_limit: usize,
    /// Characters of content kept per result.
    pub max_content_length: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: SearchOptions::DEFAULT_LIMIT,
            max_content_length: SearchOptions::DEFAULT_MAX_CONTENT_LENGTH,
        }
    }
}

impl SearchConfig {
    /// Options built from these defaults, with an optional explicit limit.
    pub fn options(&self, limit: Option<usize>) -> SearchOptions {
        SearchOptions {
            limit: limit.unwrap_or(self.default_limit),
            max_content_length: self.max_content_length,
        }
    }
}

impl Config {
    /// Load from the default location, apply environment overrides.
    pub fn load() -> Result<Self> {
        let config = match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    /// Parse a config file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config: {e}")))?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("Failed to parse config: {e}")))
    }

    /// Apply overrides from an environment-like lookup.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup(CACHE_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            self.paths.cache_root = PathBuf::from(dir);
        }
        self
    }

    /// Location of `config.toml`, if a config directory can be determined.
    pub fn config_path() -> Option<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            if !dir.trim().is_empty() {
                return Some(PathBuf::from(dir).join(CONFIG_FILE));
            }
        }
        directories::ProjectDirs::from("dev", "ax", "ax")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }
}
