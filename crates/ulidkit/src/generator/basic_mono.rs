use core::{cell::Cell, convert::Infallible};

#[cfg(feature = "tracing")]
use tracing::instrument;

use super::advance;
use crate::{IdGenStatus, RandSource, Result, TimeSource, Ulid, UlidGenerator};

/// A *monotonic* ULID generator suitable for single-threaded environments.
///
/// This generator is lightweight and fast, but is not thread-safe.
///
/// ## Features
/// - ❌ Not thread-safe
/// - ✅ Probabilistically unique (no coordination required)
/// - ✅ Time-ordered (monotonically increasing per millisecond)
///
/// ## Recommended When
/// - You're in a single-threaded environment (no shared access)
/// - You require strictly increasing IDs (IDs generated within the same
///   millisecond increment the random field)
///
/// ## See Also
/// - [`LockMonoUlidGenerator`]
///
/// [`LockMonoUlidGenerator`]: crate::LockMonoUlidGenerator
pub struct BasicMonoUlidGenerator<T, R>
where
    T: TimeSource,
    R: RandSource,
{
    state: Cell<Ulid>,
    time: T,
    rng: R,
}

impl<T, R> BasicMonoUlidGenerator<T, R>
where
    T: TimeSource,
    R: RandSource,
{
    /// Creates a new [`BasicMonoUlidGenerator`] with the provided time source
    /// and RNG.
    ///
    /// # Example
    /// ```
    /// use ulidkit::{BasicMonoUlidGenerator, IdGenStatus, SystemClock, ThreadRandom, Ulid};
    ///
    /// let generator = BasicMonoUlidGenerator::new(SystemClock, ThreadRandom);
    ///
    /// let id: Ulid = loop {
    ///     match generator.next_id() {
    ///         IdGenStatus::Ready { id } => break id,
    ///         IdGenStatus::Pending { .. } => core::hint::spin_loop(),
    ///     }
    /// };
    /// ```
    pub fn new(time: T, rng: R) -> Self {
        Self::from_state(Ulid::nil(), time, rng)
    }

    /// Creates a generator that continues after `last`.
    ///
    /// Useful for restoring the last issued ID from persistent storage so
    /// that new IDs keep sorting after it.
    pub fn from_state(last: Ulid, time: T, rng: R) -> Self {
        Self {
            state: Cell::new(last),
            time,
            rng,
        }
    }

    /// Generates a new ULID.
    ///
    /// This generator has no failure modes, so unlike
    /// [`Self::try_next_id`] the result is not wrapped.
    pub fn next_id(&self) -> IdGenStatus {
        match self.try_next_id() {
            Ok(status) => status,
            Err(e) => match e {},
        }
    }

    /// Attempts to generate a new ULID.
    ///
    /// # Returns
    /// - `Ok(IdGenStatus::Ready { id })`: A new ID is available
    /// - `Ok(IdGenStatus::Pending { yield_for })`: The time to wait (in
    ///   milliseconds) before trying again
    ///
    /// # Errors
    /// - This method never returns an error. It is fallible only to match
    ///   [`UlidGenerator::try_next_id`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_next_id(&self) -> Result<IdGenStatus, Infallible> {
        let now = self.time.current_millis();
        let mut state = self.state.get();
        let status = advance(&mut state, now, &self.rng);
        self.state.set(state);
        Ok(status)
    }
}

impl<T, R> UlidGenerator<T, R> for BasicMonoUlidGenerator<T, R>
where
    T: TimeSource,
    R: RandSource,
{
    type Err = Infallible;

    fn new(time: T, rng: R) -> Self {
        Self::new(time, rng)
    }

    fn next_id(&self) -> IdGenStatus {
        self.next_id()
    }

    fn try_next_id(&self) -> Result<IdGenStatus, Self::Err> {
        self.try_next_id()
    }
}
