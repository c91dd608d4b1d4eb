//! Construction of the random number generator of a run.
//!
//! A run consumes a single stream of random numbers, in order. Given a seed the
//! stream, and therefore the whole run, is reproducible on every platform.

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::info;

/// Rng used by the binary.
pub type RunRng = Xoshiro256PlusPlus;

/// Rng seeded from `seed`.
///
/// # Example
/// ```
/// use holstein_diagmc::rng::rng_from_seed;
/// use rand::Rng;
///
/// let mut rng_1 = rng_from_seed(1);
/// let mut rng_2 = rng_from_seed(1);
/// assert_eq!(rng_1.gen::<u64>(), rng_2.gen::<u64>());
/// ```
pub fn rng_from_seed(seed: u64) -> RunRng {
    Xoshiro256PlusPlus::seed_from_u64(seed)
}

/// Rng seeded from the entropy of the system.
pub fn rng_from_entropy() -> RunRng {
    Xoshiro256PlusPlus::from_entropy()
}

/// Rng seeded from `seed` if given, from the entropy of the system otherwise.
pub fn rng_from_optional_seed(seed: Option<u64>) -> RunRng {
    match seed {
        Some(seed) => {
            info!(seed, "rng seeded");
            rng_from_seed(seed)
        }
        None => {
            info!("rng seeded from entropy");
            rng_from_entropy()
        }
    }
}

#[cfg(test)]
mod test {
    use rand::Rng;

    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut rng_1 = rng_from_optional_seed(Some(42));
        let mut rng_2 = rng_from_seed(42);
        for _ in 0..100_u32 {
            assert_eq!(rng_1.gen::<f64>(), rng_2.gen::<f64>());
        }
        let mut rng_3 = rng_from_seed(43);
        assert_ne!(rng_from_seed(42).gen::<u64>(), rng_3.gen::<u64>());
    }
}
