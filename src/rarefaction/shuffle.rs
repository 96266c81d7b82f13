//! Random permutation of virtual reads.
//!
//! The shuffle turns the filter into a Monte Carlo estimator: without a seed,
//! repeated runs over the same table can land on different convergence
//! points. That variation is expected. Pass a seed for reproducible output.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Create a random number generator, optionally seeded for reproducibility.
///
/// With `None` the generator is seeded from OS entropy.
pub fn create_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Create the independent random stream for the specimen at `index`.
///
/// Every specimen gets its own generator, so results do not depend on the
/// order in which worker threads pick specimens up.
pub fn specimen_rng(seed: Option<u64>, index: usize) -> StdRng {
    create_rng(seed.map(|s| s.wrapping_add(index as u64)))
}

/// Uniformly permute the reads in place (Fisher-Yates).
pub fn shuffle_reads<R: Rng + ?Sized>(reads: &mut [usize], rng: &mut R) {
    reads.shuffle(rng);
}
