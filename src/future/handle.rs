//! The future handle: constructors and subscription.

use crate::core::{raise, Exclusive, FutureState, Handler, Phase};
use crate::executor::{default_executor, Executor};
use crate::future::resolver::Resolver;
use std::fmt;
use std::sync::Arc;

/// Deferred work producing the terminal result through a [`Resolver`].
pub(crate) type Task<T, E> = Box<dyn FnOnce(Resolver<T, E>) + Send + 'static>;

/// The box every handle of one future shares.
pub(crate) type Cell<T, E> = Exclusive<FutureState<T, E, Task<T, E>>>;

/// A thread-safe, lazily started value that resolves to one `Result<T, E>`.
///
/// A future created with [`Future::deferred`] is *cold*: its task only runs
/// when the first handler subscribes through [`done`](Self::done). The task
/// runs at most once no matter how many threads subscribe concurrently, and
/// every handler is invoked exactly once, on its own executor, in
/// subscription order.
///
/// Handles are cheap to clone; clones observe the same future.
///
/// # Example
///
/// ```rust
/// use coldfuture::Future;
/// use std::sync::mpsc;
///
/// let future: Future<i32, String> = Future::deferred(|resolver| resolver.succeed(2));
/// let (tx, rx) = mpsc::channel();
///
/// future
///     .map(|x| x + 2)
///     .flat_map(|x| Future::value(x + 2))
///     .done(move |result| tx.send(result).unwrap());
///
/// assert_eq!(rx.recv().unwrap(), Ok(6));
/// ```
pub struct Future<T, E> {
    cell: Arc<Cell<T, E>>,
}

impl<T, E> Future<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    fn from_state(state: FutureState<T, E, Task<T, E>>) -> Self {
        Self {
            cell: Arc::new(Exclusive::new(state)),
        }
    }

    /// An already finished future holding `Ok(value)`.
    pub fn value(value: T) -> Self {
        Self::from_result(Ok(value))
    }

    /// An already finished future holding `Err(error)`.
    pub fn error(error: E) -> Self {
        Self::from_result(Err(error))
    }

    /// An already finished future holding `result`.
    pub fn from_result(result: Result<T, E>) -> Self {
        Self::from_state(FutureState::finished(result))
    }

    /// A cold future whose `task` runs on the default executor once started.
    pub fn deferred<F>(task: F) -> Self
    where
        F: FnOnce(Resolver<T, E>) + Send + 'static,
    {
        Self::deferred_on(default_executor(), task)
    }

    /// A cold future whose `task` is submitted to `executor` once started.
    ///
    /// The task must eventually call one of the resolver's methods.
    pub fn deferred_on<X, F>(executor: X, task: F) -> Self
    where
        X: Executor,
        F: FnOnce(Resolver<T, E>) + Send + 'static,
    {
        Self::from_task(move |resolver| executor.execute(Box::new(move || task(resolver))))
    }

    /// A cold future whose task runs on whichever thread starts it.
    pub(crate) fn from_task<F>(task: F) -> Self
    where
        F: FnOnce(Resolver<T, E>) + Send + 'static,
    {
        let task: Task<T, E> = Box::new(task);
        Self::from_state(FutureState::pending(task))
    }

    /// Subscribe `handler`, running it on the default executor.
    pub fn done<H>(&self, handler: H)
    where
        H: FnOnce(Result<T, E>) + Send + 'static,
    {
        self.done_on(default_executor(), handler);
    }

    /// Subscribe `handler`, running it on `executor`.
    ///
    /// Starts the future if this is its first subscription. The handler
    /// never runs while the future's lock is held.
    pub fn done_on<X, H>(&self, executor: X, handler: H)
    where
        X: Executor,
        H: FnOnce(Result<T, E>) + Send + 'static,
    {
        let wrapped: Handler<T, E> =
            Box::new(move |result| executor.execute(Box::new(move || handler(result))));

        let (immediate, task) = self.cell.apply(|state| {
            let immediate = state.add_or_run(wrapped);
            let task = (state.phase() == Phase::NotStarted).then(|| state.start());
            (immediate, task)
        });

        if let Some(dispatch) = immediate {
            dispatch.fire();
        }

        if let Some(task) = task {
            let task = task.unwrap_or_else(|err| raise(err.into()));
            tracing::trace!(
                future = ?Arc::as_ptr(&self.cell),
                phase = %Phase::Started,
                "future started"
            );
            task(Resolver::new(Arc::clone(&self.cell)));
        }
    }

    /// Current lifecycle phase. Only a snapshot under concurrent use.
    pub fn phase(&self) -> Phase {
        self.cell.apply(|state| state.phase())
    }

    /// Whether the future holds its terminal result.
    pub fn is_finished(&self) -> bool {
        self.phase().is_final()
    }
}

impl<E> Future<(), E>
where
    E: Clone + Send + 'static,
{
    /// An already finished future carrying no data.
    pub fn unit() -> Self {
        Self::value(())
    }
}

impl<T, E> Clone for Future<T, E> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T, E> fmt::Debug for Future<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Future")
            .field("phase", &self.phase())
            .finish()
    }
}
