use crate::RandSource;

/// Adapts a closure returning a byte sequence into a [`RandSource`].
///
/// The closure is called once per fill. If it returns more bytes than needed
/// the excess is ignored; if it returns fewer, only those are written and the
/// caller tops up the remainder.
///
/// # Example
/// ```
/// use ulidkit::{FnRandom, Ulid};
///
/// let rng = FnRandom(|| vec![0xAB; 10]);
/// let id = Ulid::from_millis_and_rand(0, &rng).unwrap();
/// assert_eq!(id.randomness().to_bytes(), [0xAB; 10]);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct FnRandom<F>(pub F);

impl<F, B> RandSource for FnRandom<F>
where
    F: Fn() -> B,
    B: AsRef<[u8]>,
{
    fn fill(&self, dest: &mut [u8]) -> usize {
        let bytes = (self.0)();
        let bytes = bytes.as_ref();
        let n = bytes.len().min(dest.len());
        dest[..n].copy_from_slice(&bytes[..n]);
        n
    }
}
