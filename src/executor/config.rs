//! Thread pool configuration.

use crate::executor::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::thread;

/// Worker name prefix used when none is configured.
pub const DEFAULT_THREAD_NAME: &str = "coldfuture-worker";

/// Settings for a [`ThreadPool`](crate::executor::ThreadPool).
///
/// Missing fields fall back to [`PoolConfig::default`], so a partial JSON
/// document is a valid configuration.
///
/// # Example
///
/// ```rust
/// use coldfuture::executor::PoolConfig;
///
/// let config = PoolConfig::from_json(r#"{ "threads": 2 }"#).unwrap();
/// assert_eq!(config.threads, 2);
/// assert_eq!(config.thread_name, "coldfuture-worker");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Number of worker threads
    pub threads: usize,

    /// Prefix for worker thread names; workers are named `{prefix}-{index}`
    pub thread_name: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        let threads = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        Self {
            threads,
            thread_name: DEFAULT_THREAD_NAME.to_string(),
        }
    }
}

impl PoolConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration can actually start a pool.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threads == 0 {
            return Err(ConfigError::NoThreads);
        }

        if self.thread_name.is_empty() || self.thread_name.contains('\0') {
            return Err(ConfigError::InvalidThreadName(self.thread_name.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = PoolConfig::default();
        assert!(config.threads >= 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config = PoolConfig::from_json(r#"{ "thread_name": "io" }"#).unwrap();
        assert_eq!(config.thread_name, "io");
        assert_eq!(config.threads, PoolConfig::default().threads);
    }

    #[test]
    fn zero_threads_is_rejected() {
        let err = PoolConfig::from_json(r#"{ "threads": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::NoThreads));
    }

    #[test]
    fn empty_thread_name_is_rejected() {
        let config = PoolConfig {
            threads: 1,
            thread_name: String::new(),
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThreadName(_))
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = PoolConfig::from_json("{ threads: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn config_serializes_correctly() {
        let config = PoolConfig {
            threads: 3,
            thread_name: "pool".to_string(),
        };
        let json = serde_json::to_string(&config).unwrap();
        let back = PoolConfig::from_json(&json).unwrap();
        assert_eq!(config, back);
    }
}
