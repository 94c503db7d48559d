//! The one-shot completion handle given to a task.

use crate::core::{raise, Phase};
use crate::future::handle::Cell;
use std::fmt;
use std::sync::Arc;

/// Completes a started future exactly once.
///
/// Every resolving method consumes the resolver, so a task cannot deliver
/// two results. Dropping a resolver without resolving leaves the future
/// `Started` forever; that is logged as a warning.
pub struct Resolver<T, E> {
    cell: Option<Arc<Cell<T, E>>>,
}

impl<T, E> Resolver<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    pub(crate) fn new(cell: Arc<Cell<T, E>>) -> Self {
        Self { cell: Some(cell) }
    }

    /// Finish the future with `result` and notify every subscriber.
    ///
    /// # Panics
    ///
    /// Panics with a [`ContractViolation`](crate::core::ContractViolation)
    /// if the future is not `Started`.
    pub fn resolve(mut self, result: Result<T, E>) {
        let Some(cell) = self.cell.take() else {
            return;
        };

        let dispatch = cell
            .apply(|state| state.resolve(result))
            .unwrap_or_else(|err| raise(err.into()));

        tracing::trace!(
            future = ?Arc::as_ptr(&cell),
            phase = %Phase::Finished,
            handlers = dispatch.len(),
            "future resolved"
        );
        dispatch.fire();
    }

    /// Shorthand for `resolve(Ok(value))`.
    pub fn succeed(self, value: T) {
        self.resolve(Ok(value));
    }

    /// Shorthand for `resolve(Err(error))`.
    pub fn fail(self, error: E) {
        self.resolve(Err(error));
    }
}

impl<T, E> Drop for Resolver<T, E> {
    fn drop(&mut self) {
        if let Some(cell) = self.cell.take() {
            tracing::warn!(
                future = ?Arc::as_ptr(&cell),
                "resolver dropped without a result; subscribers will never be notified"
            );
        }
    }
}

impl<T, E> fmt::Debug for Resolver<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("pending", &self.cell.is_some())
            .finish()
    }
}
