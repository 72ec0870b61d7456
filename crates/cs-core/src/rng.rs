//! Seeded randomness for input generators and noisy entities.
//!
//! Every stream is derived from the run's `seed` and a stream name, never
//! from registration order:
//!
//!   stream_seed = seed XOR (fnv1a(name) * GOLDEN)
//!
//! Adding an entity to a scenario therefore leaves the draws of every other
//! entity unchanged, and two runs with the same seed replay identically.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const GOLDEN: u64 = 0x9e37_79b9_7f4a_7c15;

fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes.iter().fold(OFFSET, |h, &b| (h ^ b as u64).wrapping_mul(PRIME))
}

/// A named random stream.
///
/// Owned by the closure or process that draws from it; processes run one at a
/// time so it needs no locking.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// The stream called `name` under the run seed `seed`.
    pub fn for_entity(seed: u64, name: &str) -> Self {
        Self::new(seed ^ fnv1a(name.as_bytes()).wrapping_mul(GOLDEN))
    }

    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p`, clamped to `[0, 1]`.
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}
