use crate::base32::Base32Error;

pub(crate) const ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";
pub(crate) const NO_VALUE: u8 = 255;
const BITS_PER_CHAR: usize = 5;
const CHAR_MASK: u32 = 0x1F;

/// Lookup table for Crockford base32 decoding
pub(crate) const LOOKUP: [u8; 256] = {
    let mut lut = [NO_VALUE; 256];
    let mut i = 0_u8;
    // Main alphabet, allow lower-case
    while i < 32 {
        let c = ALPHABET[i as usize];
        lut[c as usize] = i;
        if c.is_ascii_uppercase() {
            lut[(c + 32) as usize] = i; // lowercase letter
        }
        i += 1;
    }
    // Crockford-specific aliases
    lut[b'O' as usize] = 0;
    lut[b'o' as usize] = 0;
    lut[b'I' as usize] = 1;
    lut[b'i' as usize] = 1;
    lut[b'L' as usize] = 1;
    lut[b'l' as usize] = 1;
    lut
};

/// One character's contribution to an output byte.
///
/// A positive `shift` moves the 5-bit character value left before it is
/// truncated into the byte; a negative `shift` moves it right. Both encoding
/// and decoding are driven by the same taps, one direction being the inverse
/// of the other.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Tap {
    pub(crate) index: u8,
    pub(crate) shift: i8,
}

impl Tap {
    /// Places a character value into its byte position.
    #[inline(always)]
    #[allow(clippy::inline_always)]
    const fn place(self, value: u8) -> u8 {
        let value = value as u32;
        let placed = if self.shift >= 0 {
            value << self.shift as u32
        } else {
            value >> (-self.shift) as u32
        };
        // Bits above the byte belong to the neighbouring byte's tap.
        placed as u8
    }

    /// Recovers the bits of the character value held by `byte`.
    #[inline(always)]
    #[allow(clippy::inline_always)]
    const fn extract(self, byte: u8) -> u8 {
        let byte = byte as u32;
        let bits = if self.shift >= 0 {
            byte >> self.shift as u32
        } else {
            byte << (-self.shift) as u32
        };
        (bits & CHAR_MASK) as u8
    }
}

/// Derives the per-byte tap table for a field of `BYTES` bytes encoded into
/// `CHARS` characters.
///
/// The bit stream is big-endian and MSB-first. The `5 * CHARS - 8 * BYTES`
/// padding bits sit in front of the first byte, so the first character holds
/// the short leftover group. A single byte spans at most three characters.
///
/// ```text
///  timestamp (6 bytes, 10 chars, 2 padding bits)
///  byte 0 = c0 << 5 | c1
///  byte 1 = c2 << 3 | c3 >> 2
///  byte 2 = c3 << 6 | c4 << 1 | c5 >> 4
///  byte 3 = c5 << 4 | c6 >> 1
///  byte 4 = c6 << 7 | c7 << 2 | c8 >> 3
///  byte 5 = c8 << 5 | c9
/// ```
pub(crate) const fn byte_taps<const BYTES: usize, const CHARS: usize>() -> [[Option<Tap>; 3]; BYTES]
{
    assert!(CHARS * BITS_PER_CHAR >= BYTES * 8, "too few characters");
    let padding = CHARS * BITS_PER_CHAR - BYTES * 8;
    assert!(padding < BITS_PER_CHAR, "too many characters");

    let mut taps = [[None; 3]; BYTES];
    let mut byte = 0;
    while byte < BYTES {
        let start = padding + byte * 8;
        let end = start + 8;
        let mut slot = 0;
        let mut index = start / BITS_PER_CHAR;
        while index * BITS_PER_CHAR < end {
            let char_end = (index + 1) * BITS_PER_CHAR;
            // The character's LSB lands on byte bit `end - char_end`.
            let shift = end as isize - char_end as isize;
            taps[byte][slot] = Some(Tap {
                index: index as u8,
                shift: shift as i8,
            });
            slot += 1;
            index += 1;
        }
        byte += 1;
    }
    taps
}

/// Fixed-geometry Crockford base32 codec for a `BYTES`-byte field rendered as
/// `CHARS` characters.
pub(crate) struct FieldCodec<const BYTES: usize, const CHARS: usize>;

impl<const BYTES: usize, const CHARS: usize> FieldCodec<BYTES, CHARS> {
    pub(crate) const TAPS: [[Option<Tap>; 3]; BYTES] = byte_taps::<BYTES, CHARS>();
    const PADDING: usize = CHARS * BITS_PER_CHAR - BYTES * 8;

    /// Encodes the field into uppercase Crockford base32 ASCII.
    pub(crate) fn encode(input: &[u8; BYTES]) -> [u8; CHARS] {
        let mut values = [0_u8; CHARS];
        for (byte, taps) in input.iter().zip(Self::TAPS.iter()) {
            for tap in taps.iter().flatten() {
                values[tap.index as usize] |= tap.extract(*byte);
            }
        }

        let mut out = [0_u8; CHARS];
        for (o, v) in out.iter_mut().zip(values) {
            // `extract` masks to 0..=31, so the index is always in bounds.
            *o = ALPHABET[v as usize];
        }
        out
    }

    /// Decodes `CHARS` characters into the field bytes.
    ///
    /// `offset` is the position of `input` inside the caller's string and is
    /// only used to report the index of an invalid character.
    ///
    /// # Errors
    ///
    /// - [`Base32Error::InvalidLength`] if `input` is not `CHARS` bytes long
    /// - [`Base32Error::InvalidAscii`] if a byte is not in the alphabet
    /// - [`Base32Error::Overflow`] if the padding bits of the first character
    ///   are set
    pub(crate) fn decode(input: &[u8], offset: usize) -> Result<[u8; BYTES], Base32Error> {
        if input.len() != CHARS {
            return Err(Base32Error::InvalidLength {
                len: input.len(),
                expected: CHARS,
            });
        }

        let mut values = [0_u8; CHARS];
        for (i, (v, &b)) in values.iter_mut().zip(input).enumerate() {
            let val = LOOKUP[b as usize];
            if val == NO_VALUE {
                return Err(Base32Error::InvalidAscii {
                    byte: b,
                    index: offset + i,
                });
            }
            *v = val;
        }

        if Self::PADDING > 0 && values[0] >> (BITS_PER_CHAR - Self::PADDING) != 0 {
            return Err(Base32Error::Overflow { index: offset });
        }

        let mut out = [0_u8; BYTES];
        for (o, taps) in out.iter_mut().zip(Self::TAPS.iter()) {
            for tap in taps.iter().flatten() {
                *o |= tap.place(values[tap.index as usize]);
            }
        }
        Ok(out)
    }
}

/// Codec for the 48-bit timestamp field.
pub(crate) type TimestampCodec = FieldCodec<6, 10>;

/// Codec for the 80-bit randomness field.
pub(crate) type RandomnessCodec = FieldCodec<10, 16>;
