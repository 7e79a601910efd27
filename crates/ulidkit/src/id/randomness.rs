use core::fmt;

use crate::{Base32Buf, RandSource, Result, ThreadRandom, base32::RandomnessCodec};

/// The 80-bit random field of a ULID.
///
/// Stored as 10 bytes. For arithmetic the bytes are read as a big-endian
/// `(hi: u16, lo: u64)` pair:
///
/// ```text
///  Byte:   0    1    2                                  9
///        +----+----+-----------------------------------+
///        | hi (16)  |            lo (64)               |
///        +----+----+-----------------------------------+
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Randomness {
    bytes: [u8; 10],
}

impl Randomness {
    pub const BITS: u32 = 80;
    pub const SIZE: usize = 10;
    pub const ENCODED_LEN: usize = 16;
    /// Largest representable value, `2^80 - 1`.
    pub const MAX: u128 = (1 << Self::BITS) - 1;
    pub const ZERO: Self = Self { bytes: [0; 10] };

    /// Draws 10 fresh bytes from the default [`ThreadRandom`] source.
    #[must_use]
    pub fn random() -> Self {
        Self::from_rand(&ThreadRandom)
    }

    /// Draws the field from `rng`.
    ///
    /// If `rng` writes fewer than 10 bytes, the remaining bytes are filled from
    /// [`ThreadRandom`].
    pub fn from_rand<R: RandSource + ?Sized>(rng: &R) -> Self {
        let mut bytes = [0_u8; 10];
        let filled = rng.fill(&mut bytes).min(Self::SIZE);
        if filled < Self::SIZE {
            #[cfg(feature = "tracing")]
            tracing::trace!(filled, "topping up randomness from the thread rng");
            ThreadRandom.fill(&mut bytes[filled..]);
        }
        Self { bytes }
    }

    #[must_use]
    pub const fn from_bytes(bytes: [u8; 10]) -> Self {
        Self { bytes }
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 10] {
        self.bytes
    }

    /// Builds the field from its high 16 and low 64 bits.
    #[must_use]
    pub const fn from_parts(hi: u16, lo: u64) -> Self {
        let h = hi.to_be_bytes();
        let l = lo.to_be_bytes();
        Self {
            bytes: [h[0], h[1], l[0], l[1], l[2], l[3], l[4], l[5], l[6], l[7]],
        }
    }

    /// Builds the field from the low 80 bits of `value`.
    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self::from_parts((value >> 64) as u16, value as u64)
    }

    /// The high 16 bits.
    #[must_use]
    pub const fn hi(self) -> u16 {
        u16::from_be_bytes([self.bytes[0], self.bytes[1]])
    }

    /// The low 64 bits.
    #[must_use]
    pub const fn lo(self) -> u64 {
        let b = self.bytes;
        u64::from_be_bytes([b[2], b[3], b[4], b[5], b[6], b[7], b[8], b[9]])
    }

    #[must_use]
    pub const fn to_u128(self) -> u128 {
        ((self.hi() as u128) << 64) | self.lo() as u128
    }

    /// Adds `n` with wraparound over the full 80-bit space.
    ///
    /// Returns `false` if the value wrapped past `2^80 - 1`, i.e. the high
    /// part decreased. Monotonic generators use this to bump the randomness
    /// of identifiers created within the same millisecond.
    pub const fn add(&mut self, n: u64) -> bool {
        let hi = self.hi();
        let (lo, carry) = self.lo().overflowing_add(n);
        let next_hi = hi.wrapping_add(carry as u16);
        *self = Self::from_parts(next_hi, lo);
        next_hi >= hi
    }

    /// Returns `true` if all 10 bytes are zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.hi() == 0 && self.lo() == 0
    }

    /// Encodes the field as 16 Crockford base32 characters.
    #[must_use]
    pub fn encode(&self) -> Base32Buf<16> {
        Base32Buf::from_ascii(RandomnessCodec::encode(&self.bytes))
    }

    /// Decodes 16 Crockford base32 characters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Base32`] for a wrong length or a character outside the
    /// alphabet.
    ///
    /// [`Error::Base32`]: crate::Error::Base32
    pub fn decode(s: impl AsRef<str>) -> Result<Self> {
        let bytes = RandomnessCodec::decode(s.as_ref().as_bytes(), 0)?;
        Ok(Self::from_bytes(bytes))
    }
}

impl fmt::Debug for Randomness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Randomness(0x{:020x})", self.to_u128())
    }
}
