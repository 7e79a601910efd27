use core::{fmt, str::FromStr};
use std::time::SystemTime;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use crate::{
    Base32Buf, Base32Error, Error, RandSource, Randomness, Result, SystemClock, ThreadRandom,
    Timestamp, Zone,
    base32::{RandomnessCodec, TimestampCodec},
};

/// A 128-bit ULID.
///
/// - 48 bits timestamp (milliseconds since the Unix epoch)
/// - 80 bits random
///
/// ```text
///  Byte:   0              5 6                    15
///        +----------------+-----------------------+
///  Field:| timestamp (48) |      random (80)      |
///        +----------------+-----------------------+
///        |<--- MSB ---- 16 bytes ---- LSB ------->|
/// ```
///
/// The bytes are kept as a plain array; [`Ulid::timestamp`] and
/// [`Ulid::randomness`] are views over the two sub-ranges. Ordering follows
/// the bytes, which is the same as ordering by timestamp first and the
/// 26-character string form.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Ulid {
    bytes: [u8; 16],
}

impl Ulid {
    pub const SIZE: usize = 16;
    pub const ENCODED_LEN: usize = 26;

    /// The all-zero ULID, `00000000000000000000000000`.
    #[must_use]
    pub const fn nil() -> Self {
        Self { bytes: [0; 16] }
    }

    /// Generates a ULID for the current instant using the built-in
    /// [`ThreadRandom`] random generator.
    ///
    /// This convenience constructor does **not** maintain any internal state
    /// and therefore does *not* guarantee monotonicity when multiple IDs are
    /// created within the same millisecond. If you need strictly increasing
    /// ULIDs, use a generator such as [`BasicMonoUlidGenerator`] or
    /// [`LockMonoUlidGenerator`].
    ///
    /// [`BasicMonoUlidGenerator`]: crate::BasicMonoUlidGenerator
    /// [`LockMonoUlidGenerator`]: crate::LockMonoUlidGenerator
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(Timestamp::now_from(&SystemClock), Randomness::random())
    }

    /// Generates a ULID from the given timestamp in milliseconds since the
    /// Unix epoch, using the built-in [`ThreadRandom`] random generator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TimestampOverflow`] if `millis` exceeds
    /// [`Timestamp::MAX`].
    pub fn from_millis(millis: u64) -> Result<Self> {
        Self::from_millis_and_rand(millis, &ThreadRandom)
    }

    /// Generates a ULID from the given timestamp in milliseconds since the
    /// Unix epoch and a custom [`RandSource`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::TimestampOverflow`] if `millis` exceeds
    /// [`Timestamp::MAX`].
    pub fn from_millis_and_rand<R>(millis: u64, rng: &R) -> Result<Self>
    where
        R: RandSource + ?Sized,
    {
        let timestamp = Timestamp::from_millis(millis)?;
        Ok(Self::from_parts(timestamp, Randomness::from_rand(rng)))
    }

    /// Generates a ULID from a naive calendar time interpreted in `zone`.
    ///
    /// # Errors
    ///
    /// See [`Timestamp::from_naive`].
    pub fn from_naive(datetime: NaiveDateTime, zone: Zone) -> Result<Self> {
        Self::from_naive_and_rand(datetime, zone, &ThreadRandom)
    }

    /// Generates a ULID from a naive calendar time interpreted in `zone` and a
    /// custom [`RandSource`].
    ///
    /// # Errors
    ///
    /// See [`Timestamp::from_naive`].
    pub fn from_naive_and_rand<R>(datetime: NaiveDateTime, zone: Zone, rng: &R) -> Result<Self>
    where
        R: RandSource + ?Sized,
    {
        let timestamp = Timestamp::from_naive(datetime, zone)?;
        Ok(Self::from_parts(timestamp, Randomness::from_rand(rng)))
    }

    /// Generates a ULID from a zone-aware calendar time.
    ///
    /// # Errors
    ///
    /// See [`Timestamp::from_datetime`].
    pub fn from_datetime<Tz: TimeZone>(datetime: &DateTime<Tz>) -> Result<Self> {
        let timestamp = Timestamp::from_datetime(datetime)?;
        Ok(Self::from_parts(timestamp, Randomness::random()))
    }

    /// Generates a ULID from a [`SystemTime`].
    ///
    /// # Errors
    ///
    /// See [`Timestamp::from_system_time`].
    pub fn from_system_time(time: SystemTime) -> Result<Self> {
        let timestamp = Timestamp::from_system_time(time)?;
        Ok(Self::from_parts(timestamp, Randomness::random()))
    }

    /// Composes a ULID from its two fields.
    #[must_use]
    pub const fn from_parts(timestamp: Timestamp, randomness: Randomness) -> Self {
        let t = timestamp.to_bytes();
        let r = randomness.to_bytes();
        Self {
            bytes: [
                t[0], t[1], t[2], t[3], t[4], t[5], r[0], r[1], r[2], r[3], r[4], r[5], r[6],
                r[7], r[8], r[9],
            ],
        }
    }

    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self { bytes }
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.bytes
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.bytes
    }

    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self {
            bytes: value.to_be_bytes(),
        }
    }

    #[must_use]
    pub const fn to_u128(self) -> u128 {
        u128::from_be_bytes(self.bytes)
    }

    /// View of bytes `0..6`.
    #[must_use]
    pub const fn timestamp(self) -> Timestamp {
        let b = self.bytes;
        Timestamp::from_bytes([b[0], b[1], b[2], b[3], b[4], b[5]])
    }

    /// View of bytes `6..16`.
    #[must_use]
    pub const fn randomness(self) -> Randomness {
        let b = self.bytes;
        Randomness::from_bytes([b[6], b[7], b[8], b[9], b[10], b[11], b[12], b[13], b[14], b[15]])
    }

    /// Milliseconds since the Unix epoch.
    #[must_use]
    pub const fn millis(self) -> u64 {
        self.timestamp().millis()
    }

    /// The timestamp as a UTC calendar time.
    #[must_use]
    pub fn datetime(self) -> DateTime<Utc> {
        self.timestamp().datetime()
    }

    /// The timestamp as a naive calendar time in `zone`.
    #[must_use]
    pub fn to_naive(self, zone: Zone) -> NaiveDateTime {
        self.timestamp().to_naive(zone)
    }

    /// The timestamp as a [`SystemTime`].
    #[must_use]
    pub fn system_time(self) -> SystemTime {
        self.timestamp().system_time()
    }

    /// Returns `true` if this is the nil ULID.
    #[must_use]
    pub const fn is_nil(self) -> bool {
        self.to_u128() == 0
    }

    /// Adds `n` to the random field in place, keeping the timestamp.
    ///
    /// Returns `false` if the random field wrapped past `2^80 - 1`; the
    /// wrapped value is still written.
    pub const fn add_random(&mut self, n: u64) -> bool {
        let mut randomness = self.randomness();
        let ok = randomness.add(n);
        *self = Self::from_parts(self.timestamp(), randomness);
        ok
    }

    /// Returns the ULID whose random field is `n` larger, or `None` if the
    /// random field would overflow.
    #[must_use]
    pub const fn increment(self, n: u64) -> Option<Self> {
        let mut next = self;
        if next.add_random(n) { Some(next) } else { None }
    }

    /// Encodes this ULID as 26 Crockford base32 characters.
    ///
    /// The first 10 characters encode the timestamp, the last 16 the
    /// randomness. The result is a stack buffer that implements
    /// [`fmt::Display`] and [`AsRef<str>`].
    ///
    /// # Example
    ///
    /// ```
    /// use ulidkit::Ulid;
    ///
    /// let id = Ulid::from_u128(2_424_242_424_242_424_242);
    /// assert_eq!(id.encode(), "000000000000023953MG16DJDJ");
    /// ```
    #[must_use]
    pub fn encode(&self) -> Base32Buf<26> {
        let (t, r) = self.bytes.split_at(Timestamp::SIZE);
        let mut t_bytes = [0_u8; 6];
        t_bytes.copy_from_slice(t);
        let mut r_bytes = [0_u8; 10];
        r_bytes.copy_from_slice(r);

        let mut buf = [0_u8; 26];
        buf[..Timestamp::ENCODED_LEN].copy_from_slice(&TimestampCodec::encode(&t_bytes));
        buf[Timestamp::ENCODED_LEN..].copy_from_slice(&RandomnessCodec::encode(&r_bytes));
        Base32Buf::from_ascii(buf)
    }

    /// Decodes a 26-character Crockford base32 string.
    ///
    /// Lowercase letters and the Crockford aliases (`O` for `0`, `I`/`L` for
    /// `1`) are accepted.
    ///
    /// # Errors
    ///
    /// - [`Base32Error::InvalidLength`] if the input is not 26 bytes long
    /// - [`Base32Error::InvalidAscii`] if a character is not in the alphabet
    /// - [`Base32Error::Overflow`] if the first character is above `7`, since
    ///   such strings exceed 128 bits
    ///
    /// # Example
    ///
    /// ```
    /// use ulidkit::Ulid;
    ///
    /// let id = Ulid::decode("01ARZ3NDEKTSV4RRFFQ69G5FAV").unwrap();
    /// assert_eq!(id.millis(), 1_469_922_850_259);
    /// ```
    pub fn decode(s: impl AsRef<str>) -> Result<Self> {
        let s = s.as_ref().as_bytes();
        if s.len() != Self::ENCODED_LEN {
            return Err(Error::Base32(Base32Error::InvalidLength {
                len: s.len(),
                expected: Self::ENCODED_LEN,
            }));
        }

        let (t, r) = s.split_at(Timestamp::ENCODED_LEN);
        let timestamp = TimestampCodec::decode(t, 0)?;
        let randomness = RandomnessCodec::decode(r, Timestamp::ENCODED_LEN)?;
        Ok(Self::from_parts(
            Timestamp::from_bytes(timestamp),
            Randomness::from_bytes(randomness),
        ))
    }

    /// Decodes `s` into `self`.
    ///
    /// The whole input is validated before anything is written, so on error
    /// `self` is left unchanged.
    ///
    /// # Errors
    ///
    /// See [`Ulid::decode`].
    pub fn decode_in_place(&mut self, s: impl AsRef<str>) -> Result<()> {
        *self = Self::decode(s)?;
        Ok(())
    }
}

impl fmt::Display for Ulid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.encode(), f)
    }
}

impl fmt::Debug for Ulid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ulid")
            .field("id", &format_args!("{self}"))
            .field("timestamp", &format_args!("{}", self.millis()))
            .field(
                "random",
                &format_args!("0x{:020x}", self.randomness().to_u128()),
            )
            .finish()
    }
}

impl FromStr for Ulid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}

impl TryFrom<&str> for Ulid {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}

impl PartialEq<str> for Ulid {
    fn eq(&self, other: &str) -> bool {
        Self::decode(other).is_ok_and(|id| id == *self)
    }
}

impl PartialEq<&str> for Ulid {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialEq<Ulid> for &str {
    fn eq(&self, other: &Ulid) -> bool {
        other == *self
    }
}

impl From<Ulid> for String {
    fn from(id: Ulid) -> Self {
        id.encode().into()
    }
}

impl From<Ulid> for u128 {
    fn from(id: Ulid) -> Self {
        id.to_u128()
    }
}

impl From<u128> for Ulid {
    fn from(value: u128) -> Self {
        Self::from_u128(value)
    }
}

impl From<[u8; 16]> for Ulid {
    fn from(bytes: [u8; 16]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<Ulid> for [u8; 16] {
    fn from(id: Ulid) -> Self {
        id.to_bytes()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::NaiveDate;

    use super::*;
    use crate::{FnRandom, LockRandom, TimeSource};

    const KNOWN: &str = "01ARZ3NDEKTSV4RRFFQ69G5FAV";
    const KNOWN_TS: u64 = 1_469_922_850_259;
    const KNOWN_RAND: u128 = 1_012_768_647_078_601_740_696_923;

    fn fixed(bytes: [u8; 10]) -> FnRandom<impl Fn() -> [u8; 10]> {
        FnRandom(move || bytes)
    }

    #[test]
    fn layout_is_timestamp_then_randomness() {
        let rng = fixed([10, 11, 12, 13, 14, 15, 16, 17, 18, 19]);
        let id = Ulid::from_millis_and_rand(0x0001_0203_0405, &rng).unwrap();
        assert_eq!(
            id.to_bytes(),
            [0, 1, 2, 3, 4, 5, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19]
        );
        assert_eq!(id.millis(), 0x0001_0203_0405);
        assert_eq!(id.randomness().hi(), 0x0A0B);
        assert_eq!(id.randomness().lo(), 0x0C0D_0E0F_1011_1213);
    }

    #[test]
    fn known_vector() {
        let id = Ulid::from_parts(
            Timestamp::from_millis(KNOWN_TS).unwrap(),
            Randomness::from_u128(KNOWN_RAND),
        );
        assert_eq!(id.encode(), KNOWN);
        assert_eq!(id.to_string(), KNOWN);

        let decoded = Ulid::decode(KNOWN).unwrap();
        assert_eq!(decoded, id);
        assert_eq!(decoded.millis(), KNOWN_TS);
        assert_eq!(decoded.randomness().to_u128(), KNOWN_RAND);
        assert_eq!(
            decoded.datetime().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            "2016-07-30T23:54:10.259Z"
        );

        let id = Ulid::decode("01EWW6K6EXQDX5JV0E9CAHPXG5").unwrap();
        assert_eq!(id.millis(), 1_611_559_180_765);
        assert_eq!(id.randomness().to_u128(), 885_339_478_614_498_720_052_741);
    }

    #[test]
    fn u128_matches_bytes() {
        let id = Ulid::from_u128(2_424_242_424_242_424_242);
        assert_eq!(id.encode(), "000000000000023953MG16DJDJ");
        assert_eq!(u128::from(id), 2_424_242_424_242_424_242);
        assert_eq!(Ulid::from(id.to_bytes()), id);
    }

    #[test]
    fn extremes() {
        assert_eq!(Ulid::nil().encode(), "00000000000000000000000000");
        assert!(Ulid::nil().is_nil());

        let max = Ulid::from_u128(u128::MAX);
        assert_eq!(max.encode(), "7ZZZZZZZZZZZZZZZZZZZZZZZZZ");
        assert_eq!(max.millis(), Timestamp::MAX);
        assert_eq!(max.randomness().to_u128(), Randomness::MAX);
        assert_eq!(Ulid::decode("7ZZZZZZZZZZZZZZZZZZZZZZZZZ").unwrap(), max);
    }

    #[test]
    fn bytes_roundtrip_through_text() {
        let rng = LockRandom::seeded(42);
        for ms in [0, 1, 1_000, KNOWN_TS, Timestamp::MAX] {
            for _ in 0..64 {
                let id = Ulid::from_millis_and_rand(ms, &rng).unwrap();
                assert_eq!(Ulid::decode(id.encode()).unwrap(), id);
            }
        }
    }

    #[test]
    fn text_roundtrip_through_bytes() {
        for s in [
            KNOWN,
            "00000000000000000000000000",
            "7ZZZZZZZZZZZZZZZZZZZZZZZZZ",
            "0123456789ABCDEFGHJKMNPQRS",
            "7TVWXYZ0123456789ABCDEFGHJ",
        ] {
            assert_eq!(Ulid::decode(s).unwrap().encode(), s);
        }
    }

    #[test]
    fn decode_normalizes_case_and_aliases() {
        let lower = Ulid::decode(KNOWN.to_lowercase()).unwrap();
        assert_eq!(lower.encode(), KNOWN);

        let aliased = Ulid::decode("OIL00000000000000000000000").unwrap();
        assert_eq!(aliased.encode(), "01100000000000000000000000");
    }

    #[test]
    fn encoding_order_follows_timestamp() {
        let low = Ulid::from_millis_and_rand(1_000, &fixed([0xFF; 10])).unwrap();
        let high = Ulid::from_millis_and_rand(1_001, &fixed([0x00; 10])).unwrap();
        assert!(low < high);
        assert!(low.encode().as_str() < high.encode().as_str());
    }

    #[test]
    fn range_boundary() {
        assert!(Ulid::from_millis(Timestamp::MAX).is_ok());
        assert_eq!(
            Ulid::from_millis(Timestamp::MAX + 1).unwrap_err(),
            Error::TimestampOverflow {
                millis: Timestamp::MAX + 1
            }
        );
    }

    #[test]
    fn decode_invalid_length_fails_without_mutation() {
        let mut id = Ulid::decode(KNOWN).unwrap();
        for bad in ["", "01ARZ3NDEKTSV4RRFFQ69G5FA", "01ARZ3NDEKTSV4RRFFQ69G5FAVX"] {
            assert_eq!(
                id.decode_in_place(bad).unwrap_err(),
                Error::Base32(Base32Error::InvalidLength {
                    len: bad.len(),
                    expected: 26,
                })
            );
            assert_eq!(id, KNOWN);
        }
    }

    #[test]
    fn decode_invalid_character_fails_without_mutation() {
        let mut id = Ulid::decode(KNOWN).unwrap();
        let res = id.decode_in_place("000000000000@0000000000000");
        assert_eq!(
            res.unwrap_err(),
            Error::Base32(Base32Error::InvalidAscii {
                byte: b'@',
                index: 12,
            })
        );
        assert_eq!(
            Ulid::decode("0000000000U000000000000000").unwrap_err(),
            Error::Base32(Base32Error::InvalidAscii {
                byte: b'U',
                index: 10,
            })
        );
        assert_eq!(id, KNOWN);

        id.decode_in_place("01EWW6K6EXQDX5JV0E9CAHPXG5").unwrap();
        assert_eq!(id.millis(), 1_611_559_180_765);
    }

    #[test]
    fn decode_rejects_values_above_128_bits() {
        assert_eq!(
            Ulid::decode("8ZZZZZZZZZZZZZZZZZZZZZZZZZ").unwrap_err(),
            Error::Base32(Base32Error::Overflow { index: 0 })
        );
    }

    #[test]
    fn decode_rejects_multibyte_input() {
        // 26 bytes, but not 26 ASCII characters
        let s = "0000000000000000000000000é";
        assert_eq!(s.len(), 27);
        assert!(Ulid::decode(s).is_err());
        let s = "000000000000000000000000é";
        assert_eq!(s.len(), 26);
        assert_eq!(
            Ulid::decode(s).unwrap_err(),
            Error::Base32(Base32Error::InvalidAscii {
                byte: 0xC3,
                index: 24,
            })
        );
    }

    #[test]
    fn increment_keeps_timestamp() {
        let id = Ulid::from_millis_and_rand(7, &fixed([0; 10])).unwrap();
        let next = id.increment(1).unwrap();
        assert_eq!(next.millis(), 7);
        assert_eq!(next.randomness().to_u128(), 1);
        assert!(id < next);

        let max = Ulid::from_millis_and_rand(7, &fixed([0xFF; 10])).unwrap();
        assert_eq!(max.increment(1), None);

        let mut wrapped = max;
        assert!(!wrapped.add_random(1));
        assert_eq!(wrapped.millis(), 7);
        assert!(wrapped.randomness().is_zero());
    }

    #[test]
    fn calendar_constructors() {
        let dt = NaiveDate::from_ymd_opt(2016, 7, 30)
            .unwrap()
            .and_hms_milli_opt(23, 56, 16, 385)
            .unwrap();
        let id = Ulid::from_naive_and_rand(dt, Zone::Utc, &fixed([1; 10])).unwrap();
        assert_eq!(id.millis(), 1_469_922_976_385);
        assert_eq!(id.to_naive(Zone::Utc), dt);
        assert_eq!(id.randomness().to_bytes(), [1; 10]);

        let id = Ulid::from_datetime(&dt.and_utc()).unwrap();
        assert_eq!(id.millis(), 1_469_922_976_385);

        let midday = NaiveDate::from_ymd_opt(2021, 3, 15)
            .unwrap()
            .and_hms_milli_opt(12, 0, 0, 7)
            .unwrap();
        let id = Ulid::from_naive(midday, Zone::Local).unwrap();
        assert_eq!(id.to_naive(Zone::Local), midday);
    }

    #[test]
    fn new_is_near_now() {
        let before = SystemClock.current_millis();
        let id = Ulid::new();
        let after = SystemClock.current_millis();
        assert!((before..=after).contains(&id.millis()));
    }

    #[test]
    fn default_source_is_unique() {
        const N: usize = 100_000;
        let ids: HashSet<Ulid> = (0..N).map(|_| Ulid::new()).collect();
        assert_eq!(ids.len(), N);
    }

    #[test]
    fn parse_and_compare_with_str() {
        let id: Ulid = KNOWN.parse().unwrap();
        assert_eq!(id, KNOWN);
        assert_eq!(KNOWN, id);
        assert_eq!(Ulid::try_from(KNOWN).unwrap(), id);
        assert_eq!(String::from(id), KNOWN);
        assert!(id != "not a ulid");
    }

    #[test]
    fn debug_shows_fields() {
        let id = Ulid::decode(KNOWN).unwrap();
        let dbg = format!("{id:?}");
        assert!(dbg.contains(KNOWN));
        assert!(dbg.contains("1469922850259"));
    }
}
