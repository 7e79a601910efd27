use core::{cmp::Ordering, fmt};

use crate::{IdGenStatus, RandSource, Randomness, Result, TimeSource, Timestamp, Ulid};

/// A minimal interface for generating monotonic ULIDs
pub trait UlidGenerator<T, R>
where
    T: TimeSource,
    R: RandSource,
{
    type Err: fmt::Debug;

    // Creates a new generator
    fn new(time: T, rng: R) -> Self;

    /// Returns the next available ID
    fn next_id(&self) -> IdGenStatus;

    /// A fallible version of [`Self::next_id`] that returns a [`Result`].
    ///
    /// # Errors
    /// - May return an error if the underlying generator uses a lock and it is
    ///   poisoned.
    fn try_next_id(&self) -> Result<IdGenStatus, Self::Err>;
}

/// Advances `state` to the next ID for a clock reading of `now`.
///
/// Within the same millisecond the random field is bumped by one; a later
/// millisecond draws fresh randomness. `state` is left untouched whenever the
/// result is [`IdGenStatus::Pending`].
pub(crate) fn advance<R>(state: &mut Ulid, now: u64, rng: &R) -> IdGenStatus
where
    R: RandSource + ?Sized,
{
    let now = now.min(Timestamp::MAX);
    let current_ts = state.millis();

    match now.cmp(&current_ts) {
        Ordering::Equal => {
            if let Some(next) = state.increment(1) {
                *state = next;
                IdGenStatus::Ready { id: next }
            } else {
                #[cfg(feature = "tracing")]
                tracing::trace!(now, "random field exhausted for this millisecond");
                IdGenStatus::Pending { yield_for: 1 }
            }
        }
        Ordering::Greater => {
            *state = Ulid::from_parts(
                Timestamp::from_millis_saturating(now),
                Randomness::from_rand(rng),
            );
            IdGenStatus::Ready { id: *state }
        }
        Ordering::Less => cold_clock_behind(now, current_ts),
    }
}

#[cold]
#[inline(never)]
fn cold_clock_behind(now: u64, current_ts: u64) -> IdGenStatus {
    let yield_for = current_ts - now;
    #[cfg(feature = "tracing")]
    tracing::debug!(now, current_ts, yield_for, "clock moved backwards");
    IdGenStatus::Pending { yield_for }
}
