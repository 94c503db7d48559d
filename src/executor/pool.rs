//! Fixed-size thread pool executor.

use crate::core::ContractViolation;
use crate::executor::config::PoolConfig;
use crate::executor::error::ConfigError;
use crate::executor::{Executor, Job};
use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

/// Shared FIFO queue feeding every worker.
///
/// The queue lock only ever guards `VecDeque` operations, never a job.
struct Injector {
    queue: Mutex<VecDeque<Job>>,
    available: Condvar,
    shutdown: AtomicBool,
}

impl Injector {
    fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
            shutdown: AtomicBool::new(false),
        }
    }

    fn queue(&self) -> MutexGuard<'_, VecDeque<Job>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, job: Job) {
        let mut queue = self.queue();
        if self.shutdown.load(Ordering::Acquire) {
            drop(queue);
            tracing::warn!("job submitted after thread pool shutdown; dropping it");
            return;
        }

        queue.push_back(job);
        self.available.notify_one();
    }

    /// Block until a job is available. Returns `None` once shut down and drained.
    fn next(&self) -> Option<Job> {
        let mut queue = self.queue();
        loop {
            if let Some(job) = queue.pop_front() {
                return Some(job);
            }

            if self.shutdown.load(Ordering::Acquire) {
                return None;
            }

            queue = self
                .available
                .wait(queue)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn shutdown(&self) {
        let _queue = self.queue();
        self.shutdown.store(true, Ordering::Release);
        self.available.notify_all();
    }
}

/// Owns the workers; shuts them down when the last pool handle goes away.
struct Workers {
    injector: Arc<Injector>,
    handles: Mutex<Vec<JoinHandle<()>>>,
    threads: usize,
}

impl Drop for Workers {
    fn drop(&mut self) {
        self.injector.shutdown();
    }
}

/// A fixed set of worker threads draining one FIFO queue.
///
/// `ThreadPool` is a cheap handle: clones share the same workers. The
/// workers stop once every handle is dropped or [`shutdown`](Self::shutdown)
/// is called, after finishing the jobs already queued.
///
/// A job that panics is logged and the worker keeps going, except for a
/// [`ContractViolation`] panic, which aborts the process.
///
/// # Example
///
/// ```rust
/// use coldfuture::executor::{Executor, ThreadPool};
/// use std::sync::mpsc;
///
/// let pool = ThreadPool::builder().threads(2).build().unwrap();
/// let (tx, rx) = mpsc::channel();
///
/// pool.execute(Box::new(move || tx.send(21 * 2).unwrap()));
///
/// assert_eq!(rx.recv().unwrap(), 42);
/// pool.shutdown();
/// pool.join();
/// ```
#[derive(Clone)]
pub struct ThreadPool {
    workers: Arc<Workers>,
}

impl ThreadPool {
    /// Start a pool from a validated configuration.
    pub fn new(config: PoolConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let injector = Arc::new(Injector::new());
        let mut handles = Vec::with_capacity(config.threads);

        for index in 0..config.threads {
            let worker = Arc::clone(&injector);
            let spawned = thread::Builder::new()
                .name(format!("{}-{}", config.thread_name, index))
                .spawn(move || run_worker(&worker, index));

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    injector.shutdown();
                    return Err(ConfigError::Spawn(err));
                }
            }
        }

        tracing::debug!(
            threads = config.threads,
            name = %config.thread_name,
            "thread pool started"
        );

        Ok(Self {
            workers: Arc::new(Workers {
                injector,
                handles: Mutex::new(handles),
                threads: config.threads,
            }),
        })
    }

    /// Create a [`ThreadPoolBuilder`](crate::executor::ThreadPoolBuilder).
    pub fn builder() -> crate::executor::ThreadPoolBuilder {
        crate::executor::ThreadPoolBuilder::new()
    }

    /// Number of worker threads.
    pub fn threads(&self) -> usize {
        self.workers.threads
    }

    /// Stop accepting jobs. Workers exit after draining the queue.
    pub fn shutdown(&self) {
        tracing::debug!("thread pool shutting down");
        self.workers.injector.shutdown();
    }

    /// Wait for every worker to exit.
    ///
    /// Call after [`shutdown`](Self::shutdown), and never from a job running
    /// on this pool.
    pub fn join(&self) {
        let handles: Vec<_> = self
            .workers
            .handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();

        for handle in handles {
            let _ = handle.join();
        }
    }
}

impl Executor for ThreadPool {
    fn execute(&self, job: Job) {
        self.workers.injector.push(job);
    }
}

impl std::fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadPool")
            .field("threads", &self.workers.threads)
            .finish_non_exhaustive()
    }
}

fn run_worker(injector: &Injector, index: usize) {
    while let Some(job) = injector.next() {
        let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) else {
            continue;
        };

        if let Some(violation) = payload.downcast_ref::<ContractViolation>() {
            tracing::error!(worker = index, %violation, "contract violation on pool worker; aborting");
            std::process::abort();
        }

        tracing::warn!(
            worker = index,
            panic = panic_message(payload.as_ref()),
            "job panicked"
        );
    }

    tracing::debug!(worker = index, "worker exiting");
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "<non-string panic payload>"
    }
}
