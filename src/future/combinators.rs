//! Transformations that build new cold futures from existing ones.
//!
//! Each combinator returns a future whose own task subscribes to the
//! receiver. Building a chain therefore runs nothing; the first `done` on the
//! outermost future starts every link, innermost first.

use crate::executor::{default_executor, Executor};
use crate::future::handle::Future;
use crate::future::resolver::Resolver;

impl<T, E> Future<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Transform the success value on the default executor.
    pub fn map<U, F>(&self, transform: F) -> Future<U, E>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        self.map_on(default_executor(), transform)
    }

    /// Transform the success value on `executor`; failures pass through.
    pub fn map_on<X, U, F>(&self, executor: X, transform: F) -> Future<U, E>
    where
        X: Executor,
        U: Clone + Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        let source = self.clone();
        Future::from_task(move |resolver: Resolver<U, E>| {
            source.done_on(executor, move |result| resolver.resolve(result.map(transform)));
        })
    }

    /// Transform the failure on the default executor.
    pub fn map_error<G, F>(&self, transform: F) -> Future<T, G>
    where
        G: Clone + Send + 'static,
        F: FnOnce(E) -> G + Send + 'static,
    {
        self.map_error_on(default_executor(), transform)
    }

    /// Transform the failure on `executor`; success values pass through.
    pub fn map_error_on<X, G, F>(&self, executor: X, transform: F) -> Future<T, G>
    where
        X: Executor,
        G: Clone + Send + 'static,
        F: FnOnce(E) -> G + Send + 'static,
    {
        let source = self.clone();
        Future::from_task(move |resolver: Resolver<T, G>| {
            source.done_on(executor, move |result| {
                resolver.resolve(result.map_err(transform))
            });
        })
    }

    /// Chain a future-returning step on the default executor.
    pub fn flat_map<U, F>(&self, transform: F) -> Future<U, E>
    where
        U: Clone + Send + 'static,
        F: FnOnce(T) -> Future<U, E> + Send + 'static,
    {
        self.flat_map_on(default_executor(), transform)
    }

    /// Chain a future-returning step.
    ///
    /// On success `transform` runs on `executor` and the returned future's
    /// result is forwarded. A failure is forwarded as-is and `executor` is
    /// never used.
    pub fn flat_map_on<X, U, F>(&self, executor: X, transform: F) -> Future<U, E>
    where
        X: Executor,
        U: Clone + Send + 'static,
        F: FnOnce(T) -> Future<U, E> + Send + 'static,
    {
        let source = self.clone();
        Future::from_task(move |resolver: Resolver<U, E>| {
            source.done(move |result| match result {
                Ok(value) => executor.execute(Box::new(move || {
                    transform(value).done(move |inner| resolver.resolve(inner));
                })),
                Err(error) => resolver.fail(error),
            });
        })
    }

    /// Recover from a failure with another future, on the default executor.
    pub fn flat_map_error<G, F>(&self, transform: F) -> Future<T, G>
    where
        G: Clone + Send + 'static,
        F: FnOnce(E) -> Future<T, G> + Send + 'static,
    {
        self.flat_map_error_on(default_executor(), transform)
    }

    /// Recover from a failure with another future.
    ///
    /// Mirror image of [`flat_map_on`](Self::flat_map_on): success values
    /// are forwarded without touching `executor`.
    pub fn flat_map_error_on<X, G, F>(&self, executor: X, transform: F) -> Future<T, G>
    where
        X: Executor,
        G: Clone + Send + 'static,
        F: FnOnce(E) -> Future<T, G> + Send + 'static,
    {
        let source = self.clone();
        Future::from_task(move |resolver: Resolver<T, G>| {
            source.done(move |result| match result {
                Ok(value) => resolver.succeed(value),
                Err(error) => executor.execute(Box::new(move || {
                    transform(error).done(move |inner| resolver.resolve(inner));
                })),
            });
        })
    }
}
