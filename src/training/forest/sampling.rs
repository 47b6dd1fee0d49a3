//! Row and feature sampling for forest training.
//!
//! Two seeded samplers:
//!
//! - [`BootstrapSampler`]: rows with replacement, once per tree; the rows a
//!   tree never sees are its out-of-bag set.
//! - [`FeatureSampler`]: `mtry` features without replacement, once per node.
//!
//! Seeds mix the tree seed with node ids, so growing the same tree twice
//! (or in parallel) samples identically.

use rand::prelude::*;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Seed-mixing constant (golden ratio).
const SEED_MIX: u64 = 0x9E3779B97F4A7C15;

// ============================================================================
// BootstrapSampler
// ============================================================================

/// Result of bootstrap sampling for one tree.
#[derive(Debug, Clone)]
pub struct BootstrapSample {
    /// Sampled row indices, with repetition, sorted.
    pub in_bag: Vec<u32>,
    /// Rows never drawn, sorted.
    pub oob: Vec<u32>,
}

/// Samples rows with replacement, one draw per tree.
#[derive(Debug, Clone, Copy)]
pub struct BootstrapSampler {
    /// Number of draws as a fraction of the row count, in (0, 1].
    pub rate: f32,
}

impl BootstrapSampler {
    /// Create a new bootstrap sampler.
    ///
    /// # Panics
    ///
    /// Panics if `rate` is not in (0, 1].
    pub fn new(rate: f32) -> Self {
        assert!(rate > 0.0 && rate <= 1.0, "rate must be in (0, 1]");
        Self { rate }
    }

    /// Draw a bootstrap sample of `n_rows` rows.
    pub fn sample(&self, n_rows: usize, seed: u64) -> BootstrapSample {
        let n_draws = ((n_rows as f32 * self.rate).ceil() as usize).max(1);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

        let mut in_bag = Vec::with_capacity(n_draws);
        let mut seen = vec![false; n_rows];
        for _ in 0..n_draws {
            let row = rng.gen_range(0..n_rows);
            in_bag.push(row as u32);
            seen[row] = true;
        }
        in_bag.sort_unstable();

        let oob = (0..n_rows as u32).filter(|&r| !seen[r as usize]).collect();
        BootstrapSample { in_bag, oob }
    }
}

// ============================================================================
// FeatureSampler
// ============================================================================

/// Samples `mtry` features without replacement at every node.
#[derive(Debug, Clone, Copy)]
pub struct FeatureSampler {
    num_features: u32,
    mtry: u32,
}

impl FeatureSampler {
    /// Create a new feature sampler.
    ///
    /// # Panics
    ///
    /// Panics if `mtry` is not in `[1, num_features]`.
    pub fn new(num_features: u32, mtry: u32) -> Self {
        assert!(
            mtry >= 1 && mtry <= num_features,
            "mtry must be in [1, num_features]"
        );
        Self { num_features, mtry }
    }

    /// Returns true if fewer than all features are considered per node.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.mtry < self.num_features
    }

    /// Features allowed at a specific node.
    ///
    /// The node id enters the seed, so every node of a tree draws its own
    /// subset while remaining reproducible.
    pub fn sample_for_node(&self, node_id: u32, tree_seed: u64) -> Vec<u32> {
        if !self.is_enabled() {
            return (0..self.num_features).collect();
        }
        let node_seed = tree_seed.wrapping_add((node_id as u64).wrapping_mul(SEED_MIX));
        sample_without_replacement(self.num_features, self.mtry as usize, node_seed)
    }
}

/// Sample `k` items from `0..n` without replacement.
///
/// Returns sorted indices for cache-friendly access.
fn sample_without_replacement(n: u32, k: usize, seed: u64) -> Vec<u32> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut indices: Vec<u32> = (0..n).collect();

    // Partial Fisher-Yates shuffle
    for i in 0..k {
        let j = rng.gen_range(i..n as usize);
        indices.swap(i, j);
    }

    let mut sampled: Vec<u32> = indices[..k].to_vec();
    sampled.sort_unstable();
    sampled
}

// ============================================================================
// Tests
// ============================================================================
