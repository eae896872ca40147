//! Identifier generation.
//!
//! Run and batch identifiers come from an explicit, passed-in generator
//! handle rather than any process-wide random state, so concurrent runs
//! never contend on hidden globals and tests can pin the sequence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// An explicit handle for identifier generation.
#[derive(Debug)]
pub struct IdGenerator {
    rng: StdRng,
}

impl IdGenerator {
    /// Creates a generator seeded from OS entropy. This is the default for
    /// real batches: identical configurations must still land in distinct
    /// run directories.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Creates a deterministic generator for tests.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Returns `n` random bytes as lowercase hex (`2n` characters).
    pub fn hex(&mut self, n: usize) -> String {
        let mut buf = vec![0u8; n];
        self.rng.fill(&mut buf[..]);
        hex::encode(buf)
    }

    /// A 32-character run or batch identifier.
    pub fn id(&mut self) -> String {
        self.hex(16)
    }

    /// An 8-character suffix for run directory names.
    pub fn dir_suffix(&mut self) -> String {
        self.hex(4)
    }
}
