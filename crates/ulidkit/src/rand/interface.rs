/// A trait for random sources that fill a byte buffer.
///
/// This abstraction allows you to plug in a real random source or a mocked
/// random source in tests.
///
/// A source may write fewer bytes than requested; it reports how many it wrote
/// and the caller tops up the rest from [`ThreadRandom`].
///
/// # Example
/// ```
/// use ulidkit::RandSource;
///
/// struct FixedRand;
/// impl RandSource for FixedRand {
///     fn fill(&self, dest: &mut [u8]) -> usize {
///         dest.fill(0x42);
///         dest.len()
///     }
/// }
///
/// let mut buf = [0; 4];
/// assert_eq!(FixedRand.fill(&mut buf), 4);
/// assert_eq!(buf, [0x42; 4]);
/// ```
///
/// [`ThreadRandom`]: crate::ThreadRandom
pub trait RandSource {
    /// Writes random bytes to the front of `dest` and returns how many were
    /// written.
    fn fill(&self, dest: &mut [u8]) -> usize;
}

impl<R: RandSource + ?Sized> RandSource for &R {
    fn fill(&self, dest: &mut [u8]) -> usize {
        (**self).fill(dest)
    }
}
