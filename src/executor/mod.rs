//! Executors: where handlers and tasks actually run.
//!
//! The future core never spawns threads itself. Every unit of work is handed
//! to an [`Executor`], which the host application supplies. This module also
//! ships a few ready-made ones:
//!
//! - [`ThreadPool`]: fixed set of worker threads, also the default executor
//! - [`Inline`]: runs work immediately on the submitting thread
//! - `tokio::runtime::Handle` with the `tokio` feature

pub mod builder;
pub mod config;
pub mod error;
mod pool;

pub use builder::ThreadPoolBuilder;
pub use config::PoolConfig;
pub use error::ConfigError;
pub use pool::ThreadPool;

use std::sync::{Arc, OnceLock};

/// A zero-argument unit of work.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Accepts jobs and runs them later, possibly concurrently.
pub trait Executor: Send + Sync + 'static {
    /// Submit `job`. Must not run it while holding any lock of the caller.
    fn execute(&self, job: Job);
}

impl<X: Executor + ?Sized> Executor for Arc<X> {
    fn execute(&self, job: Job) {
        (**self).execute(job)
    }
}

impl<X: Executor + ?Sized> Executor for &'static X {
    fn execute(&self, job: Job) {
        (**self).execute(job)
    }
}

/// Runs every job immediately on the thread that submits it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Inline;

impl Executor for Inline {
    fn execute(&self, job: Job) {
        job()
    }
}

#[cfg(feature = "tokio")]
impl Executor for tokio::runtime::Handle {
    fn execute(&self, job: Job) {
        drop(self.spawn_blocking(job));
    }
}

/// The general-purpose background executor.
///
/// A process-wide [`ThreadPool`] built from [`PoolConfig::default`] on first
/// use. Every call returns a handle to the same pool.
///
/// # Panics
///
/// Panics if the worker threads cannot be spawned on first use.
pub fn default_executor() -> ThreadPool {
    static DEFAULT: OnceLock<ThreadPool> = OnceLock::new();

    DEFAULT
        .get_or_init(|| {
            ThreadPool::new(PoolConfig::default())
                .unwrap_or_else(|err| panic!("failed to start the default executor: {err}"))
        })
        .clone()
}
