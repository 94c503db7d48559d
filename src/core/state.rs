//! The future's lifecycle state machine.
//!
//! Every operation here is meant to run inside a single
//! [`Exclusive::apply`](super::Exclusive::apply) call. None of them invokes a
//! handler: work that has to reach user code is captured in a [`Dispatch`]
//! and fired by the caller once the lock is released.

use super::error::TransitionError;
use super::phase::Phase;
use std::fmt;
use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::thread;

/// One-shot callback receiving the terminal result.
pub type Handler<T, E> = Box<dyn FnOnce(Result<T, E>) + Send + 'static>;

/// Handlers captured under the lock, to be invoked after it is released.
#[must_use = "a dispatch does nothing until it is fired"]
pub struct Dispatch<T, E> {
    handlers: Vec<Handler<T, E>>,
    result: Result<T, E>,
}

impl<T: Clone, E: Clone> Dispatch<T, E> {
    /// Invoke every captured handler in subscription order.
    ///
    /// The last handler receives the result by move; the others get clones.
    /// A panicking handler does not stop the ones after it: every handler
    /// runs, then the first panic resumes unwinding in the caller.
    pub fn fire(self) {
        let Self {
            mut handlers,
            result,
        } = self;

        let Some(last) = handlers.pop() else {
            return;
        };

        let mut first_panic = None;
        let mut record = |index: usize, outcome: thread::Result<()>| {
            let Err(payload) = outcome else {
                return;
            };
            if first_panic.is_none() {
                first_panic = Some(payload);
            } else {
                tracing::warn!(handler = index, "another handler panicked during dispatch");
            }
        };

        let count = handlers.len();
        for (index, handler) in handlers.into_iter().enumerate() {
            let result = result.clone();
            record(index, panic::catch_unwind(AssertUnwindSafe(move || handler(result))));
        }
        record(count, panic::catch_unwind(AssertUnwindSafe(move || last(result))));

        if let Some(payload) = first_panic {
            panic::resume_unwind(payload);
        }
    }
}

impl<T, E> Dispatch<T, E> {
    /// Number of captured handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handler was captured.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// The result every handler will receive.
    pub fn result(&self) -> &Result<T, E> {
        &self.result
    }
}

/// State of a future, generic over the stored task type `K`.
///
/// Transitions are strictly `NotStarted -> Started -> Finished`.
pub enum FutureState<T, E, K> {
    /// Initial. Holds the task and every handler subscribed so far.
    NotStarted { handlers: Vec<Handler<T, E>>, task: K },

    /// The task has been handed off; only handlers remain.
    Started { handlers: Vec<Handler<T, E>> },

    /// Terminal and immutable.
    Finished(Result<T, E>),
}

impl<T, E, K> FutureState<T, E, K> {
    /// A state holding `task`, with no handlers.
    pub fn pending(task: K) -> Self {
        Self::NotStarted {
            handlers: Vec::new(),
            task,
        }
    }

    /// An already finished state.
    pub fn finished(result: Result<T, E>) -> Self {
        Self::Finished(result)
    }

    pub fn phase(&self) -> Phase {
        match self {
            Self::NotStarted { .. } => Phase::NotStarted,
            Self::Started { .. } => Phase::Started,
            Self::Finished(_) => Phase::Finished,
        }
    }

    /// Number of handlers waiting for the result.
    pub fn waiting(&self) -> usize {
        match self {
            Self::NotStarted { handlers, .. } | Self::Started { handlers } => handlers.len(),
            Self::Finished(_) => 0,
        }
    }

    /// Queue `handler`, or capture it with the result if already finished.
    pub fn add_or_run(&mut self, handler: Handler<T, E>) -> Option<Dispatch<T, E>>
    where
        T: Clone,
        E: Clone,
    {
        match self {
            Self::NotStarted { handlers, .. } | Self::Started { handlers } => {
                handlers.push(handler);
                None
            }
            Self::Finished(result) => Some(Dispatch {
                handlers: vec![handler],
                result: result.clone(),
            }),
        }
    }

    /// Take the task out and move to `Started`.
    ///
    /// Only legal from `NotStarted`.
    pub fn start(&mut self) -> Result<K, TransitionError> {
        let phase = self.phase();
        if !phase.can_advance_to(Phase::Started) {
            return Err(TransitionError::NotStartable { phase });
        }

        let placeholder = Self::Started {
            handlers: Vec::new(),
        };
        match mem::replace(self, placeholder) {
            Self::NotStarted { handlers, task } => {
                *self = Self::Started { handlers };
                Ok(task)
            }
            other => {
                *self = other;
                Err(TransitionError::NotStartable { phase })
            }
        }
    }

    /// Record the result and hand back every queued handler with it.
    ///
    /// Only legal from `Started`.
    pub fn resolve(&mut self, result: Result<T, E>) -> Result<Dispatch<T, E>, TransitionError>
    where
        T: Clone,
        E: Clone,
    {
        let phase = self.phase();
        if !phase.can_advance_to(Phase::Finished) {
            return Err(TransitionError::NotResolvable { phase });
        }

        match self {
            Self::Started { handlers } => {
                let handlers = mem::take(handlers);
                *self = Self::Finished(result.clone());
                Ok(Dispatch { handlers, result })
            }
            _ => Err(TransitionError::NotResolvable { phase }),
        }
    }
}

impl<T: fmt::Debug, E: fmt::Debug, K> fmt::Debug for FutureState<T, E, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted { handlers, .. } => f
                .debug_struct("NotStarted")
                .field("handlers", &handlers.len())
                .finish_non_exhaustive(),
            Self::Started { handlers } => f
                .debug_struct("Started")
                .field("handlers", &handlers.len())
                .finish(),
            Self::Finished(result) => f.debug_tuple("Finished").field(result).finish(),
        }
    }
}
