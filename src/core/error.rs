//! Contract violation types.

use super::phase::Phase;
use thiserror::Error;

/// An out-of-sequence lifecycle transition.
///
/// Returned by the state machine operations so they stay pure; the public
/// surface turns every one of these into a [`ContractViolation`] panic.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Cannot start a future that is already {phase}")]
    NotStartable { phase: Phase },

    #[error("Cannot resolve a future that is {phase}")]
    NotResolvable { phase: Phase },
}

/// A broken internal invariant.
///
/// These never describe a domain condition. They are raised as panics whose
/// payload is the violation itself, so an executor can recognise them.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContractViolation {
    #[error("apply was re-entered on a box already held by this thread")]
    ReentrantApply,

    #[error("lock poisoned by a panic inside apply")]
    LockPoisoned,

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// Log the violation and unwind with it as the panic payload.
#[track_caller]
pub(crate) fn raise(violation: ContractViolation) -> ! {
    tracing::error!(%violation, "contract violation");
    std::panic::panic_any(violation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_error_names_the_phase() {
        let err = TransitionError::NotResolvable {
            phase: Phase::Finished,
        };
        assert_eq!(err.to_string(), "Cannot resolve a future that is Finished");
    }

    #[test]
    fn transition_error_converts_into_violation() {
        let err = TransitionError::NotStartable {
            phase: Phase::Started,
        };
        let violation: ContractViolation = err.into();

        assert_eq!(violation, ContractViolation::Transition(err));
        assert_eq!(violation.to_string(), err.to_string());
    }

    #[test]
    fn raise_panics_with_the_violation_as_payload() {
        let payload = std::panic::catch_unwind(|| raise(ContractViolation::LockPoisoned))
            .expect_err("raise must unwind");

        let violation = payload
            .downcast_ref::<ContractViolation>()
            .expect("payload is the violation");
        assert_eq!(*violation, ContractViolation::LockPoisoned);
    }
}
