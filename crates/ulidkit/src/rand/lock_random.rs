use ::rand::{RngCore, SeedableRng, rngs::StdRng};

use crate::{RandSource, generator::Mutex};

/// A `RandSource` that shares one generator behind the crate mutex.
///
/// Useful for injecting a deterministic, seeded generator that several
/// threads draw from. [`ThreadRandom`] is the better default for production
/// use since it needs no locking.
///
/// If the lock is poisoned the source reports that it wrote nothing, and the
/// caller falls back to [`ThreadRandom`].
///
/// [`ThreadRandom`]: crate::ThreadRandom
#[derive(Debug)]
pub struct LockRandom<R> {
    rng: Mutex<R>,
}

impl<R: RngCore> LockRandom<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl LockRandom<StdRng> {
    /// Creates a reproducible source from a 64-bit seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: RngCore> RandSource for LockRandom<R> {
    fn fill(&self, dest: &mut [u8]) -> usize {
        #[cfg(feature = "parking-lot")]
        let mut rng = self.rng.lock();
        #[cfg(not(feature = "parking-lot"))]
        let Ok(mut rng) = self.rng.lock() else {
            #[cfg(feature = "tracing")]
            tracing::warn!("random source lock poisoned, deferring to the thread rng");
            return 0;
        };

        rng.fill_bytes(dest);
        dest.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_bytes() {
        let a = LockRandom::seeded(7);
        let b = LockRandom::seeded(7);
        let (mut x, mut y) = ([0_u8; 16], [0_u8; 16]);
        assert_eq!(a.fill(&mut x), 16);
        assert_eq!(b.fill(&mut y), 16);
        assert_eq!(x, y);

        a.fill(&mut x);
        assert_ne!(x, y);
    }

    #[cfg(not(feature = "parking-lot"))]
    #[test]
    fn poisoned_lock_writes_nothing() {
        use crate::Randomness;

        let src = LockRandom::seeded(7);
        std::thread::scope(|s| {
            let holder = s.spawn(|| {
                let _guard = src.rng.lock();
                panic!("poison the lock");
            });
            assert!(holder.join().is_err());
        });
        assert!(src.rng.is_poisoned());

        let mut buf = [0xAA_u8; 10];
        assert_eq!(src.fill(&mut buf), 0);
        assert_eq!(buf, [0xAA; 10]);

        // The shortfall is topped up elsewhere, so ids still get randomness.
        let a = Randomness::from_rand(&src);
        let b = Randomness::from_rand(&src);
        assert_ne!(a, b);
    }
}
