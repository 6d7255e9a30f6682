//! Determinism testing utilities.
//!
//! Army placement is seeded and the path search breaks ties by insertion
//! order, so identical inputs must produce identical battles. The harness
//! here runs a scenario several times, sequentially or on scoped threads,
//! and compares result hashes.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
}

impl DeterminismResult {
    fn from_hashes(hashes: Vec<u64>) -> Self {
        Self {
            is_deterministic: hashes.windows(2).all(|w| w[0] == w[1]),
            hashes,
        }
    }

    /// Get all unique hashes (should be 1 for a deterministic scenario).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that every run matched, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Scenario is non-deterministic!\n\
                 Runs: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a scenario `runs` times in sequence and compare result hashes.
pub fn verify_determinism<T, F>(runs: usize, scenario: F) -> DeterminismResult
where
    T: Hash,
    F: Fn() -> T,
{
    let hashes = (0..runs).map(|_| compute_hash(&scenario())).collect();
    DeterminismResult::from_hashes(hashes)
}

/// Run a scenario on `threads` scoped threads at once and compare hashes.
///
/// # Panics
///
/// Panics if a scenario thread panics.
pub fn verify_parallel_determinism<T, F>(threads: usize, scenario: F) -> DeterminismResult
where
    T: Hash,
    F: Fn() -> T + Sync,
{
    let hashes = thread::scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|_| s.spawn(|| compute_hash(&scenario())))
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().expect("scenario thread panicked"))
            .collect()
    });
    DeterminismResult::from_hashes(hashes)
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}
