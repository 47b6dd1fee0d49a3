//! Stratified train/test partitioning.
//!
//! A single seeded holdout split that preserves class proportions: each
//! class's samples are shuffled independently and a fixed fraction moves to
//! the holdout side. Same seed, same partition.

use rand::prelude::*;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Partition `0..labels.len()` into (train, holdout) index sets.
///
/// Per class, `holdout_fraction` of the samples (rounded) go to the holdout
/// side; when a class has at least two samples, both sides get at least one.
/// Returned index lists are sorted.
///
/// # Panics
///
/// Panics if `holdout_fraction` is not in `(0, 1)` or a label is out of
/// range.
pub fn stratified_split(
    labels: &[u32],
    n_classes: usize,
    holdout_fraction: f32,
    seed: u64,
) -> (Vec<usize>, Vec<usize>) {
    assert!(
        holdout_fraction > 0.0 && holdout_fraction < 1.0,
        "holdout_fraction must be in (0, 1)"
    );

    let mut by_class: Vec<Vec<usize>> = vec![Vec::new(); n_classes];
    for (i, &label) in labels.iter().enumerate() {
        assert!(
            (label as usize) < n_classes,
            "label {label} out of range for {n_classes} classes"
        );
        by_class[label as usize].push(i);
    }

    let mut train = Vec::new();
    let mut holdout = Vec::new();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

    for members in by_class.iter_mut() {
        let n = members.len();
        if n == 0 {
            continue;
        }
        members.shuffle(&mut rng);

        let mut n_holdout = (n as f32 * holdout_fraction).round() as usize;
        // Keep both sides non-empty whenever the class allows it.
        if n >= 2 {
            n_holdout = n_holdout.clamp(1, n - 1);
        } else {
            n_holdout = n_holdout.min(n);
        }

        holdout.extend_from_slice(&members[..n_holdout]);
        train.extend_from_slice(&members[n_holdout..]);
    }

    train.sort_unstable();
    holdout.sort_unstable();
    (train, holdout)
}
