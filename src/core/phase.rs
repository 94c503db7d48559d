//! Lifecycle phase of a future.
//!
//! A future moves through its phases in one direction only:
//! `NotStarted -> Started -> Finished`. The phase is a plain value that can
//! be inspected, logged and serialized without touching the future itself.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a future is in its lifecycle.
///
/// # Example
///
/// ```rust
/// use coldfuture::core::Phase;
///
/// assert!(Phase::NotStarted.can_advance_to(Phase::Started));
/// assert!(!Phase::Finished.can_advance_to(Phase::Started));
/// assert!(Phase::Finished.is_final());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Phase {
    /// Holds its task; nobody has subscribed yet.
    NotStarted,
    /// The task was handed off and has not resolved.
    Started,
    /// Terminal. The result never changes again.
    Finished,
}

impl Phase {
    /// Name of the phase for display/logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::NotStarted => "NotStarted",
            Self::Started => "Started",
            Self::Finished => "Finished",
        }
    }

    /// Check if this is the terminal phase.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Finished)
    }

    /// Check whether `next` is the single legal successor of this phase.
    pub fn can_advance_to(&self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Self::NotStarted, Self::Started) | (Self::Started, Self::Finished)
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
