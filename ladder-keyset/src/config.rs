//! Pagination configuration.
//!
//! # Environment Variables
//!
//! | Variable                   | Default | Description                          |
//! |----------------------------|---------|--------------------------------------|
//! | `LADDER_CURSOR_VERSION`    | 1       | Cursor schema version                |
//! | `LADDER_DEFAULT_PAGE_SIZE` | 25      | Page size when the client sends none |
//! | `LADDER_MAX_PAGE_SIZE`     | 100     | Upper bound on any page size         |
//! | `LADDER_MAX_CURSOR_LEN`    | 4096    | Maximum accepted cursor token length |
//!
//! Bump `LADDER_CURSOR_VERSION` whenever the sort columns of an endpoint
//! change: tokens issued before the bump are then rejected and clients restart
//! from the first page.
//!
//! The same settings can be read from TOML:
//!
//! ```
//! use ladder_keyset::PagerConfig;
//!
//! let config = PagerConfig::from_toml_str(
//!     r#"
//!     cursor_version = 3
//!     max_page_size = 50
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.cursor_version, 3);
//! assert_eq!(config.max_page_size, 50);
//! assert_eq!(config.default_page_size, 25);
//! ```

use serde::Deserialize;
use thiserror::Error;

use crate::pagination::DEFAULT_MAX_TOKEN_LEN;

const DEFAULT_CURSOR_VERSION: i64 = 1;
const DEFAULT_PAGE_SIZE: usize = 25;
const DEFAULT_MAX_PAGE_SIZE: usize = 100;

/// Invalid pagination configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("invalid pagination config: {0}")]
    Toml(#[from] toml::de::Error),
    /// `max_page_size` is zero.
    #[error("max_page_size must be at least 1")]
    ZeroMaxPageSize,
    /// `default_page_size` is zero or above `max_page_size`.
    #[error("default_page_size {default} must be between 1 and max_page_size {max}")]
    DefaultPageSizeOutOfRange {
        /// Configured default.
        default: usize,
        /// Configured maximum.
        max: usize,
    },
}

/// Pagination settings shared by every [`Pager`](crate::Pager).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PagerConfig {
    /// Schema version stamped into every cursor.
    pub cursor_version: i64,
    /// Page size used when the client does not ask for one.
    pub default_page_size: usize,
    /// Largest page a client can ask for.
    pub max_page_size: usize,
    /// Longest cursor token accepted, in bytes.
    pub max_cursor_len: usize,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            cursor_version: DEFAULT_CURSOR_VERSION,
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            max_cursor_len: DEFAULT_MAX_TOKEN_LEN,
        }
    }
}

impl PagerConfig {
    /// Read settings from environment variables and validate them.
    ///
    /// Missing or unparseable values fall back to their defaults; parsed
    /// values that break the page-size bounds are an error.
    ///
    /// ```
    /// use ladder_keyset::PagerConfig;
    ///
    /// let env = vec![
    ///     ("LADDER_MAX_PAGE_SIZE".to_string(), "200".to_string()),
    ///     ("LADDER_CURSOR_VERSION".to_string(), "not a number".to_string()),
    /// ];
    /// let config = PagerConfig::from_env(&env).unwrap();
    /// assert_eq!(config.max_page_size, 200);
    /// assert_eq!(config.cursor_version, 1);
    /// ```
    pub fn from_env(env: &[(String, String)]) -> Result<Self, ConfigError> {
        fn parsed<T: std::str::FromStr>(env: &[(String, String)], name: &str, default: T) -> T {
            env.iter()
                .find(|(k, _)| k == name)
                .and_then(|(_, v)| v.trim().parse().ok())
                .unwrap_or(default)
        }

        let defaults = Self::default();
        let config = Self {
            cursor_version: parsed(env, "LADDER_CURSOR_VERSION", defaults.cursor_version),
            default_page_size: parsed(env, "LADDER_DEFAULT_PAGE_SIZE", defaults.default_page_size),
            max_page_size: parsed(env, "LADDER_MAX_PAGE_SIZE", defaults.max_page_size),
            max_cursor_len: parsed(env, "LADDER_MAX_CURSOR_LEN", defaults.max_cursor_len),
        };
        config.validate()?;
        Ok(config)
    }

    /// Read settings from the process environment.
    pub fn from_process_env() -> Result<Self, ConfigError> {
        let env: Vec<(String, String)> = std::env::vars().collect();
        Self::from_env(&env)
    }

    /// Parse settings from a TOML document and validate them.
    ///
    /// Keys that are left out keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the page-size bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_page_size == 0 {
            return Err(ConfigError::ZeroMaxPageSize);
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(ConfigError::DefaultPageSizeOutOfRange {
                default: self.default_page_size,
                max: self.max_page_size,
            });
        }
        Ok(())
    }

    /// Resolve a client's requested page size into `1..=max_page_size`.
    #[must_use]
    pub fn page_size(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_page_size)
            .min(self.max_page_size)
            .max(1)
    }
}
