use core::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Local, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc};

use crate::{Base32Buf, Error, Result, TimeSource, Zone, base32::TimestampCodec};

/// The 48-bit millisecond timestamp field of a ULID.
///
/// Stored as 6 bytes, most significant first, so byte order equals numeric
/// order. Every value in `0..=Timestamp::MAX` is representable; anything larger
/// is rejected at construction.
///
/// ```text
///  Byte:   0      1      2      3      4      5
///        +------+------+------+------+------+------+
///        | MSB  |      |      |      |      | LSB  |
///        +------+------+------+------+------+------+
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    bytes: [u8; 6],
}

impl Timestamp {
    pub const BITS: u32 = 48;
    pub const SIZE: usize = 6;
    pub const ENCODED_LEN: usize = 10;
    /// Largest representable value, `2^48 - 1` ms (year 10889).
    pub const MAX: u64 = (1 << Self::BITS) - 1;
    pub const ZERO: Self = Self {
        bytes: [0; 6],
    };

    /// Creates a timestamp from milliseconds since the Unix epoch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TimestampOverflow`] if `millis` exceeds
    /// [`Timestamp::MAX`].
    pub const fn from_millis(millis: u64) -> Result<Self> {
        if millis > Self::MAX {
            return Err(Error::TimestampOverflow { millis });
        }
        Ok(Self::from_millis_truncated(millis))
    }

    /// Creates a timestamp, clamping values above [`Timestamp::MAX`].
    #[must_use]
    pub const fn from_millis_saturating(millis: u64) -> Self {
        if millis > Self::MAX {
            Self::from_millis_truncated(Self::MAX)
        } else {
            Self::from_millis_truncated(millis)
        }
    }

    const fn from_millis_truncated(millis: u64) -> Self {
        let be = millis.to_be_bytes();
        Self {
            bytes: [be[2], be[3], be[4], be[5], be[6], be[7]],
        }
    }

    /// Reads the current time from `clock`, clamped to the representable
    /// range.
    pub fn now_from<T: TimeSource + ?Sized>(clock: &T) -> Self {
        Self::from_millis_saturating(clock.current_millis())
    }

    /// Creates a timestamp from a [`SystemTime`].
    ///
    /// # Errors
    ///
    /// - [`Error::TimestampBeforeEpoch`] for instants before 1970
    /// - [`Error::TimestampOverflow`] for instants after year 10889
    pub fn from_system_time(time: SystemTime) -> Result<Self> {
        let elapsed = time
            .duration_since(UNIX_EPOCH)
            .map_err(|_| Error::TimestampBeforeEpoch)?;
        let millis = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        Self::from_millis(millis)
    }

    /// Creates a timestamp from a zone-aware calendar time.
    ///
    /// # Errors
    ///
    /// - [`Error::TimestampBeforeEpoch`] for instants before 1970
    /// - [`Error::TimestampOverflow`] for instants after year 10889
    pub fn from_datetime<Tz: TimeZone>(datetime: &DateTime<Tz>) -> Result<Self> {
        let millis =
            u64::try_from(datetime.timestamp_millis()).map_err(|_| Error::TimestampBeforeEpoch)?;
        Self::from_millis(millis)
    }

    /// Creates a timestamp from a naive calendar time interpreted in `zone`.
    ///
    /// A local time that occurs twice (when clocks are turned back) resolves
    /// to the earlier instant.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidLocalTime`] if the local time is skipped by a
    ///   timezone transition
    /// - [`Error::TimestampBeforeEpoch`] / [`Error::TimestampOverflow`] as for
    ///   [`Timestamp::from_datetime`]
    pub fn from_naive(datetime: NaiveDateTime, zone: Zone) -> Result<Self> {
        match zone {
            Zone::Utc => Self::from_datetime(&datetime.and_utc()),
            Zone::Local => Self::from_naive_in(datetime, &Local),
        }
    }

    /// Creates a timestamp from a naive calendar time interpreted in any
    /// chrono time zone.
    ///
    /// Candidate instants come from the zone's offsets one day either side of
    /// `datetime`; a candidate is kept only if the zone shows `datetime` at
    /// that instant. The earliest survivor wins, so a repeated local time
    /// resolves to its first occurrence.
    ///
    /// # Errors
    ///
    /// Same as [`Timestamp::from_naive`].
    pub fn from_naive_in<Tz: TimeZone>(datetime: NaiveDateTime, tz: &Tz) -> Result<Self> {
        let day = TimeDelta::days(1);
        let around = [
            datetime.checked_sub_signed(day),
            Some(datetime),
            datetime.checked_add_signed(day),
        ];
        let instant = around
            .into_iter()
            .flatten()
            .filter_map(|near| {
                let offset = tz.offset_from_utc_datetime(&near).fix();
                let shift = TimeDelta::seconds(i64::from(offset.local_minus_utc()));
                let utc = datetime.checked_sub_signed(shift)?;
                (tz.offset_from_utc_datetime(&utc).fix() == offset).then_some(utc)
            })
            .min()
            .ok_or(Error::InvalidLocalTime { datetime })?;
        Self::from_datetime(&instant.and_utc())
    }

    #[must_use]
    pub const fn from_bytes(bytes: [u8; 6]) -> Self {
        Self { bytes }
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 6] {
        self.bytes
    }

    /// Returns the milliseconds since the Unix epoch.
    #[must_use]
    pub const fn millis(self) -> u64 {
        let b = self.bytes;
        u64::from_be_bytes([0, 0, b[0], b[1], b[2], b[3], b[4], b[5]])
    }

    /// Returns this timestamp as a [`SystemTime`].
    #[must_use]
    pub fn system_time(self) -> SystemTime {
        UNIX_EPOCH + Duration::from_millis(self.millis())
    }

    /// Returns this timestamp as a UTC calendar time.
    #[must_use]
    pub fn datetime(self) -> DateTime<Utc> {
        // 48-bit millis always fall inside chrono's supported range.
        i64::try_from(self.millis())
            .ok()
            .and_then(DateTime::from_timestamp_millis)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Returns this timestamp as a naive calendar time in `zone`.
    #[must_use]
    pub fn to_naive(self, zone: Zone) -> NaiveDateTime {
        let utc = self.datetime();
        match zone {
            Zone::Utc => utc.naive_utc(),
            Zone::Local => utc.with_timezone(&Local).naive_local(),
        }
    }

    /// Encodes the timestamp as 10 Crockford base32 characters.
    ///
    /// The first character carries only 3 bits, so it is always `0`..=`7`.
    #[must_use]
    pub fn encode(&self) -> Base32Buf<10> {
        Base32Buf::from_ascii(TimestampCodec::encode(&self.bytes))
    }

    /// Decodes 10 Crockford base32 characters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Base32`] for a wrong length, a character outside the
    /// alphabet, or a first character above `7`.
    pub fn decode(s: impl AsRef<str>) -> Result<Self> {
        let bytes = TimestampCodec::decode(s.as_ref().as_bytes(), 0)?;
        Ok(Self::from_bytes(bytes))
    }
}

impl TryFrom<u64> for Timestamp {
    type Error = Error;

    fn try_from(millis: u64) -> Result<Self> {
        Self::from_millis(millis)
    }
}

impl From<Timestamp> for u64 {
    fn from(ts: Timestamp) -> Self {
        ts.millis()
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({} ms, {})", self.millis(), self.encode())
    }
}
