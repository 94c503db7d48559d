//! Builder for constructing thread pools.

use crate::executor::config::PoolConfig;
use crate::executor::error::ConfigError;
use crate::executor::pool::ThreadPool;

/// Builder for constructing thread pools with a fluent API.
pub struct ThreadPoolBuilder {
    config: PoolConfig,
}

impl ThreadPoolBuilder {
    /// Create a new builder starting from [`PoolConfig::default`].
    pub fn new() -> Self {
        Self {
            config: PoolConfig::default(),
        }
    }

    /// Set the number of worker threads.
    pub fn threads(mut self, threads: usize) -> Self {
        self.config.threads = threads;
        self
    }

    /// Set the worker thread name prefix.
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.config.thread_name = name.into();
        self
    }

    /// Replace every setting with a loaded configuration.
    pub fn config(mut self, config: PoolConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate the settings and start the workers.
    pub fn build(self) -> Result<ThreadPool, ConfigError> {
        ThreadPool::new(self.config)
    }
}

impl Default for ThreadPoolBuilder {
    fn default() -> Self {
        Self::new()
    }
}
