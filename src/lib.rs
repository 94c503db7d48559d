//! Coldfuture: thread-safe, lazily started futures.
//!
//! A [`Future`] delivers exactly one `Result<T, E>` to every subscriber.
//! Futures built with [`Future::deferred`] are *cold*: their work does not
//! run until someone subscribes with [`Future::done`], and it runs at most
//! once however many threads subscribe at the same time.
//!
//! # Core Concepts
//!
//! - **Exclusive box**: the only way shared state is touched; one atomic
//!   "apply under lock" operation
//! - **State machine**: `NotStarted -> Started -> Finished`, with handlers
//!   captured under the lock and invoked after it is released
//! - **Executors**: every handler and task runs on an [`Executor`] chosen by
//!   the caller, defaulting to a shared background [`ThreadPool`]
//!
//! # Example
//!
//! ```rust
//! use coldfuture::Future;
//! use std::sync::mpsc;
//!
//! let lookup: Future<u32, String> = Future::deferred(|resolver| {
//!     // expensive work, started on first subscription
//!     resolver.succeed(40)
//! });
//!
//! let (tx, rx) = mpsc::channel();
//! lookup
//!     .map(|n| n + 2)
//!     .map_error(|err| format!("lookup failed: {err}"))
//!     .done(move |result| tx.send(result).unwrap());
//!
//! assert_eq!(rx.recv().unwrap(), Ok(42));
//! ```

pub mod core;
pub mod executor;
pub mod future;

// Re-export commonly used types
pub use crate::core::{ContractViolation, Phase};
pub use crate::executor::{default_executor, Executor, Inline, ThreadPool};
pub use crate::future::{Future, Resolver};
