//! Mutual-exclusion box.
//!
//! [`Exclusive`] owns one value and hands out access to it only through
//! [`Exclusive::apply`]. Every other accessor is a thin layer over `apply`.

use super::error::{raise, ContractViolation};
use std::cell::RefCell;
use std::fmt;
use std::sync::Mutex;

thread_local! {
    /// Addresses of the boxes the current thread is inside `apply` for.
    static HELD: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Marks a box as held by the current thread for the lifetime of the mark.
struct HeldMark {
    address: usize,
}

impl HeldMark {
    fn enter(address: usize) -> Self {
        let reentered = HELD.with(|held| {
            let mut held = held.borrow_mut();
            if held.contains(&address) {
                return true;
            }
            held.push(address);
            false
        });

        if reentered {
            raise(ContractViolation::ReentrantApply);
        }

        Self { address }
    }
}

impl Drop for HeldMark {
    fn drop(&mut self) {
        HELD.with(|held| {
            let mut held = held.borrow_mut();
            if let Some(pos) = held.iter().rposition(|a| *a == self.address) {
                held.swap_remove(pos);
            }
        });
    }
}

/// A value that can only be touched under its lock.
///
/// The lock is not re-entrant. Calling `apply` on a box from inside a
/// closure already running under that same box's `apply` panics with
/// [`ContractViolation::ReentrantApply`] instead of deadlocking.
///
/// # Example
///
/// ```rust
/// use coldfuture::core::Exclusive;
///
/// let counter = Exclusive::new(0);
/// let previous = counter.apply(|n| {
///     *n += 1;
///     *n - 1
/// });
///
/// assert_eq!(previous, 0);
/// assert_eq!(counter.get(), 1);
/// ```
pub struct Exclusive<T> {
    value: Mutex<T>,
}

impl<T> Exclusive<T> {
    /// Create a box owning `value`.
    pub fn new(value: T) -> Self {
        Self {
            value: Mutex::new(value),
        }
    }

    /// Run `f` with exclusive mutable access to the value.
    ///
    /// `f` should be short and must not call `apply` on the same box.
    ///
    /// # Panics
    ///
    /// Panics with [`ContractViolation::ReentrantApply`] on re-entry and
    /// with [`ContractViolation::LockPoisoned`] if an earlier `f` panicked.
    pub fn apply<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let _held = HeldMark::enter(self.address());
        let mut guard = self
            .value
            .lock()
            .unwrap_or_else(|_| raise(ContractViolation::LockPoisoned));
        f(&mut *guard)
    }

    /// Replace the value, returning the old one.
    pub fn replace(&self, value: T) -> T {
        self.apply(|current| std::mem::replace(current, value))
    }

    /// Overwrite the value.
    pub fn set(&self, value: T) {
        self.apply(|current| *current = value);
    }

    /// Consume the box and return the value.
    pub fn into_inner(self) -> T {
        self.value
            .into_inner()
            .unwrap_or_else(|_| raise(ContractViolation::LockPoisoned))
    }

    fn address(&self) -> usize {
        self as *const Self as usize
    }
}

impl<T: Clone> Exclusive<T> {
    /// Clone the current value out of the box.
    pub fn get(&self) -> T {
        self.apply(|current| current.clone())
    }
}

impl<T: Default> Default for Exclusive<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> fmt::Debug for Exclusive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exclusive").finish_non_exhaustive()
    }
}
