//! The public future surface.
//!
//! - [`Future`]: constructors, subscription and inspection
//! - [`Resolver`]: the completion handle a deferred task receives
//! - combinators: `map`, `map_error`, `flat_map`, `flat_map_error`
//!
//! Every operation that takes an executor has two forms: the plain one
//! uses [`default_executor`](crate::executor::default_executor), the `_on`
//! one takes the executor explicitly.

mod combinators;
mod handle;
mod resolver;

pub use handle::Future;
pub use resolver::Resolver;
