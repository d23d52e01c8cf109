//! Injectable randomness
//!
//! Every bit and basis draw in the simulator goes through a single
//! [`RandomSource`], so production can use operating-system entropy while tests
//! substitute a seeded or scripted source without touching protocol logic.

use crate::basis::{Bit, MeasurementBasis};
use parking_lot::Mutex;
use rand::rngs::OsRng;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Abstract randomness source - can be OS entropy or a seeded/deterministic RNG
pub trait RandomSource: Send + Sync {
    /// Generate a random u64
    fn next_u64(&self) -> u64;

    /// Generate a uniform value in `[0, 1)`
    fn next_f64(&self) -> f64 {
        // 53 high bits fill the f64 mantissa exactly
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

/// Uniform bit: `< 0.5` maps to 0
pub fn random_bit(source: &dyn RandomSource) -> Bit {
    if source.next_f64() < 0.5 {
        Bit::Zero
    } else {
        Bit::One
    }
}

/// Uniform basis: `< 0.5` maps to rectilinear
pub fn random_basis(source: &dyn RandomSource) -> MeasurementBasis {
    if source.next_f64() < 0.5 {
        MeasurementBasis::Rectilinear
    } else {
        MeasurementBasis::Diagonal
    }
}

/// True with probability `p`
pub fn bernoulli(source: &dyn RandomSource, p: f64) -> bool {
    source.next_f64() < p
}

/// Operating-system entropy with a thread-local fallback
///
/// Uses [`OsRng`]. If the OS source ever fails, a warning is logged once and
/// draws fall back to `rand::thread_rng()`.
#[derive(Debug, Default)]
pub struct OsRandomSource {
    fallback_logged: AtomicBool,
}

impl OsRandomSource {
    /// Create a new OS random source
    pub fn new() -> Self {
        Self::default()
    }
}

impl RandomSource for OsRandomSource {
    fn next_u64(&self) -> u64 {
        let mut bytes = [0u8; 8];
        match OsRng.try_fill_bytes(&mut bytes) {
            Ok(()) => u64::from_le_bytes(bytes),
            Err(err) => {
                if !self.fallback_logged.swap(true, Ordering::Relaxed) {
                    tracing::warn!(error = %err, "OS entropy unavailable, falling back to thread RNG");
                }
                rand::thread_rng().next_u64()
            }
        }
    }
}

/// Seeded deterministic RNG for tests and reproducible runs
///
/// ChaCha8 behind a mutex: same seed, same sequence.
#[derive(Debug, Clone)]
pub struct SeededRandomSource {
    seed: u64,
    rng: Arc<Mutex<ChaCha8Rng>>,
}

impl SeededRandomSource {
    /// Create a new seeded RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Arc::new(Mutex::new(ChaCha8Rng::seed_from_u64(seed))),
        }
    }

    /// Create with a seed derived from a test name, for test isolation
    pub fn from_test_name(test_name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        test_name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Seed this source was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandomSource {
    fn next_u64(&self) -> u64 {
        self.rng.lock().next_u64()
    }
}

/// Seeded source when a seed is given, OS entropy otherwise
pub fn source_from_seed(seed: Option<u64>) -> Arc<dyn RandomSource> {
    match seed {
        Some(seed) => Arc::new(SeededRandomSource::new(seed)),
        None => Arc::new(OsRandomSource::new()),
    }
}
