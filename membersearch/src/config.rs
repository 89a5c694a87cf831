//! Runtime settings read from the environment.
//!
//! | variable            | default           |
//! |---------------------|-------------------|
//! | `DATABASE_URL`      | `sqlite::memory:` |
//! | `BIND_ADDR`         | `0.0.0.0:3000`    |
//! | `DEFAULT_PAGE_SIZE` | `20`              |
//! | `MAX_PAGE_SIZE`     | `2000`            |
//! | `SEED_SAMPLE_DATA`  | `false`           |
//!
//! A value that does not parse falls back to its default with a warning.

use std::env;
use std::fmt::Display;
use std::str::FromStr;

use crate::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

pub const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Page sizing applied by the REST layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingConfig {
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl PagingConfig {
    /// Requested size, or the default when absent, capped at the maximum.
    /// Non-positive sizes pass through so request validation can reject them.
    #[must_use]
    pub fn page_size(&self, requested: Option<i64>) -> i64 {
        let max = i64::try_from(self.max_page_size).unwrap_or(i64::MAX);
        requested.map_or_else(
            || i64::try_from(self.default_page_size).unwrap_or(max).min(max),
            |size| size.min(max),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub paging: PagingConfig,
    pub seed_sample_data: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            paging: PagingConfig::default(),
            seed_sample_data: false,
        }
    }
}

impl AppConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup, e.g. a map in tests.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let mut paging = PagingConfig {
            default_page_size: parse_or(
                &lookup,
                "DEFAULT_PAGE_SIZE",
                defaults.paging.default_page_size,
            ),
            max_page_size: parse_or(&lookup, "MAX_PAGE_SIZE", defaults.paging.max_page_size),
        };
        if paging.default_page_size == 0 {
            tracing::warn!("DEFAULT_PAGE_SIZE must be positive, using {DEFAULT_PAGE_SIZE}");
            paging.default_page_size = DEFAULT_PAGE_SIZE;
        }
        if paging.max_page_size < paging.default_page_size {
            tracing::warn!(
                max = paging.max_page_size,
                default = paging.default_page_size,
                "MAX_PAGE_SIZE below DEFAULT_PAGE_SIZE, raising it"
            );
            paging.max_page_size = paging.default_page_size;
        }

        Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            paging,
            seed_sample_data: lookup("SEED_SAMPLE_DATA")
                .is_some_and(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes")),
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Display + Copy,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "invalid value, using default {default}");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.paging.default_page_size, 20);
        assert_eq!(config.paging.max_page_size, 2000);
        assert!(!config.seed_sample_data);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("DATABASE_URL", "sqlite://members.db"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("DEFAULT_PAGE_SIZE", "10"),
            ("MAX_PAGE_SIZE", "50"),
            ("SEED_SAMPLE_DATA", "TRUE"),
        ]);
        assert_eq!(config.database_url, "sqlite://members.db");
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.paging.default_page_size, 10);
        assert_eq!(config.paging.max_page_size, 50);
        assert!(config.seed_sample_data);
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = config_from(&[("DEFAULT_PAGE_SIZE", "lots"), ("MAX_PAGE_SIZE", "-3")]);
        assert_eq!(config.paging, PagingConfig::default());

        let config = config_from(&[("DEFAULT_PAGE_SIZE", "0")]);
        assert_eq!(config.paging.default_page_size, 20);
    }

    #[test]
    fn test_max_never_below_default() {
        let config = config_from(&[("DEFAULT_PAGE_SIZE", "100"), ("MAX_PAGE_SIZE", "10")]);
        assert_eq!(config.paging.max_page_size, 100);
    }

    #[test]
    fn test_page_size_is_clamped() {
        let paging = PagingConfig {
            default_page_size: 20,
            max_page_size: 50,
        };
        assert_eq!(paging.page_size(None), 20);
        assert_eq!(paging.page_size(Some(5)), 5);
        assert_eq!(paging.page_size(Some(5000)), 50);
        assert_eq!(paging.page_size(Some(0)), 0);
        assert_eq!(paging.page_size(Some(-1)), -1);
    }
}
