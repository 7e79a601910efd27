//! Thread-local ULID generation utilities.
//!
//! Each thread owns a [`BasicMonoUlidGenerator`] over the system clock and the
//! thread-local RNG, so IDs created on one thread are strictly increasing
//! without any locking.
//!
//! In rare cases where the generator saturates within the same millisecond
//! (monotonic overflow), or the wall clock steps backwards, it waits using the
//! configured backoff strategy before retrying.
//!
//! # Example
//! ```rust
//! use ulidkit::{Backoff, ulid_mono};
//!
//! let a = ulid_mono(Backoff::Yield);
//! let b = ulid_mono(Backoff::Yield);
//! assert!(a < b);
//! ```

use std::time::Duration;

use crate::{BasicMonoUlidGenerator, IdGenStatus, SystemClock, ThreadRandom, Ulid};

thread_local! {
    static BASIC_MONO_ULID: BasicMonoUlidGenerator<SystemClock, ThreadRandom> =
        BasicMonoUlidGenerator::new(SystemClock, ThreadRandom);
}

/// Backoff strategies for handling a [`IdGenStatus::Pending`] result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Backoff {
    /// Busy-waits in a tight loop.
    ///
    /// Offers maximum throughput at the cost of high CPU usage.
    Spin,

    /// Yields to the OS scheduler to allow other threads to run.
    #[default]
    Yield,

    /// Sleeps for the requested retry delay in milliseconds.
    ///
    /// Lowest CPU usage, but may oversleep depending on platform-specific
    /// scheduler resolution.
    Sleep,
}

/// Generates a ULID using the specified [`Backoff`] strategy.
///
/// This is a convenient wrapper around [`ulid_mono_with_backoff`] with built-in
/// strategies.
pub fn ulid_mono(strategy: Backoff) -> Ulid {
    ulid_mono_with_backoff(|yield_for| match strategy {
        Backoff::Spin => core::hint::spin_loop(),
        Backoff::Yield => std::thread::yield_now(),
        Backoff::Sleep => std::thread::sleep(Duration::from_millis(yield_for)),
    })
}

/// Generates a ULID using a custom backoff strategy.
///
/// `f` is called with the recommended wait in milliseconds each time the
/// generator reports [`IdGenStatus::Pending`].
///
/// # Example
/// ```rust
/// use ulidkit::ulid_mono_with_backoff;
///
/// let id = ulid_mono_with_backoff(|yield_for| {
///     std::thread::sleep(std::time::Duration::from_millis(yield_for * 2));
/// });
/// println!("{id}");
/// ```
pub fn ulid_mono_with_backoff(f: impl Fn(u64)) -> Ulid {
    BASIC_MONO_ULID.with(|g| {
        loop {
            match g.next_id() {
                IdGenStatus::Ready { id } => break id,
                IdGenStatus::Pending { yield_for } => f(yield_for),
            }
        }
    })
}
