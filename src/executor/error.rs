//! Executor configuration errors.

use thiserror::Error;

/// Errors that can occur when configuring or starting a thread pool.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Thread pool needs at least one worker thread")]
    NoThreads,

    #[error("Invalid worker thread name {0:?}")]
    InvalidThreadName(String),

    #[error("Invalid pool configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}
