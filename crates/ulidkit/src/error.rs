use chrono::NaiveDateTime;
use thiserror::Error;

use crate::{Base32Error, Timestamp};

/// A result type defaulting to this crate's [`enum@Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors that `ulidkit` can produce.
///
/// Invalid input never panics: out-of-range timestamps and malformed text
/// surface here instead of silently producing a zeroed identifier.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The timestamp does not fit in 48 bits (after year 10889).
    #[error("timestamp {millis}ms exceeds the 48-bit maximum of {max}ms", max = Timestamp::MAX)]
    TimestampOverflow { millis: u64 },

    /// The instant lies before the Unix epoch.
    #[error("timestamp precedes the unix epoch")]
    TimestampBeforeEpoch,

    /// A local calendar time falls into a gap of the local timezone (e.g. a
    /// daylight-saving transition).
    #[error("local time {datetime} does not exist in the local timezone")]
    InvalidLocalTime { datetime: NaiveDateTime },

    /// The text form could not be decoded.
    #[error(transparent)]
    Base32(#[from] Base32Error),

    /// The operation failed because a lock was **poisoned**.
    ///
    /// This occurs when a thread panics while holding the lock. When the
    /// `parking-lot` feature is enabled, mutexes do **not** poison, so this
    /// variant is not available.
    #[cfg(not(feature = "parking-lot"))]
    #[error("lock poisoned")]
    LockPoisoned,
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = Error::TimestampOverflow { millis: 1 << 48 };
        assert_eq!(
            err.to_string(),
            "timestamp 281474976710656ms exceeds the 48-bit maximum of 281474976710655ms"
        );

        let err = Error::from(Base32Error::InvalidLength {
            len: 3,
            expected: 26,
        });
        assert_eq!(
            err.to_string(),
            "invalid length: expected 26 characters, got 3"
        );
    }
}
