use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use super::advance;
#[cfg(not(feature = "parking-lot"))]
use crate::generator::PoisonError;
use crate::{Error, IdGenStatus, RandSource, Result, TimeSource, Ulid, UlidGenerator, generator::Mutex};

/// A lock-based *monotonic* ULID generator suitable for multi-threaded
/// environments.
///
/// This generator wraps the last issued ID in an [`Arc<Mutex<_>>`], allowing
/// safe shared use across threads. Cloning the generator shares that state, so
/// every clone continues the same increasing sequence.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Probabilistically unique (no coordination required)
/// - ✅ Time-ordered (monotonically increasing per millisecond)
///
/// ## See Also
/// - [`BasicMonoUlidGenerator`]
///
/// [`BasicMonoUlidGenerator`]: crate::BasicMonoUlidGenerator
pub struct LockMonoUlidGenerator<T, R>
where
    T: TimeSource,
    R: RandSource,
{
    pub(crate) state: Arc<Mutex<Ulid>>,
    time: T,
    rng: R,
}

impl<T, R> LockMonoUlidGenerator<T, R>
where
    T: TimeSource,
    R: RandSource,
{
    /// Creates a new [`LockMonoUlidGenerator`] with the provided time source
    /// and RNG.
    ///
    /// # Example
    /// ```
    /// use ulidkit::{IdGenStatus, LockMonoUlidGenerator, SystemClock, ThreadRandom, Ulid};
    ///
    /// let generator = LockMonoUlidGenerator::new(SystemClock, ThreadRandom);
    ///
    /// let id: Ulid = loop {
    ///     match generator.next_id() {
    ///         IdGenStatus::Ready { id } => break id,
    ///         IdGenStatus::Pending { .. } => std::thread::yield_now(),
    ///     }
    /// };
    /// ```
    pub fn new(time: T, rng: R) -> Self {
        Self::from_state(Ulid::nil(), time, rng)
    }

    /// Creates a generator that continues after `last`.
    pub fn from_state(last: Ulid, time: T, rng: R) -> Self {
        Self {
            state: Arc::new(Mutex::new(last)),
            time,
            rng,
        }
    }

    /// Generates a new ULID.
    ///
    /// A lock poisoned by a panicking thread is recovered: the guarded ID is
    /// always a fully written value, so generation continues from it. Use
    /// [`Self::try_next_id`] to observe poisoning instead.
    pub fn next_id(&self) -> IdGenStatus {
        let now = self.time.current_millis();

        #[cfg(feature = "parking-lot")]
        let mut id = self.state.lock();
        #[cfg(not(feature = "parking-lot"))]
        let mut id = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        advance(&mut id, now, &self.rng)
    }

    /// Attempts to generate a new ULID with fallible error handling.
    ///
    /// # Returns
    /// - `Ok(IdGenStatus::Ready { id })`: A new ID is available
    /// - `Ok(IdGenStatus::Pending { yield_for })`: The time to wait (in
    ///   milliseconds) before trying again
    /// - `Err(e)`: the lock was poisoned
    ///
    /// # Errors
    /// - Returns [`Error::LockPoisoned`] if the underlying lock has been
    ///   poisoned. With the `parking-lot` feature this never happens.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_next_id(&self) -> Result<IdGenStatus, Error> {
        let now = self.time.current_millis();

        #[cfg(feature = "parking-lot")]
        let mut id = self.state.lock();
        #[cfg(not(feature = "parking-lot"))]
        let mut id = self.state.lock()?;

        Ok(advance(&mut id, now, &self.rng))
    }
}

impl<T, R> Clone for LockMonoUlidGenerator<T, R>
where
    T: TimeSource + Clone,
    R: RandSource + Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            time: self.time.clone(),
            rng: self.rng.clone(),
        }
    }
}

impl<T, R> UlidGenerator<T, R> for LockMonoUlidGenerator<T, R>
where
    T: TimeSource,
    R: RandSource,
{
    type Err = Error;

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
