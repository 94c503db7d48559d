//! Core primitives: the exclusive box and the future state machine.
//!
//! This module contains the part of the crate with real concurrency hazards:
//! - [`Exclusive`], the only way to touch shared state
//! - [`FutureState`], the three-phase lifecycle and its transitions
//! - [`Dispatch`], handler invocations captured under the lock
//!
//! Nothing in this module calls user code while a lock is held.

mod error;
mod exclusive;
mod phase;
mod state;

pub use error::{ContractViolation, TransitionError};
pub use exclusive::Exclusive;
pub use phase::Phase;
pub use state::{Dispatch, FutureState, Handler};

pub(crate) use error::raise;
