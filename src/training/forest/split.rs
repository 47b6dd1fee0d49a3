//! Gini split search.

use crate::dataset::Dataset;

/// A chosen split: feature, threshold, and its impurity gain.
///
/// Samples with `value < threshold` go left. Thresholds are midpoints
/// between adjacent distinct values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitCandidate {
    pub feature: u32,
    pub threshold: f32,
    pub gain: f64,
}

/// Gini impurity of a class-count vector.
fn gini(counts: &[u64], total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    let sum_sq: f64 = counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum();
    1.0 - sum_sq
}

/// Find the best Gini split for `indices` over the candidate `features`.
///
/// Missing values are excluded from threshold evaluation (they are routed by
/// the grower's default direction); each feature's gain is computed over its
/// non-missing subset. Both children must receive at least
/// `min_samples_leaf` non-missing samples. Returns `None` when no candidate
/// has positive gain.
pub fn best_split(
    dataset: &Dataset,
    indices: &[u32],
    features: &[u32],
    n_classes: usize,
    min_samples_leaf: usize,
) -> Option<SplitCandidate> {
    let labels = dataset.labels();
    let mut best: Option<SplitCandidate> = None;

    // Reused per feature: (value, label) pairs sorted by value.
    let mut pairs: Vec<(f32, u32)> = Vec::with_capacity(indices.len());

    for &feature in features {
        pairs.clear();
        for &i in indices {
            let value = dataset.value(feature as usize, i as usize);
            if !value.is_nan() {
                pairs.push((value, labels[i as usize]));
            }
        }

        let n = pairs.len();
        if n < 2 * min_samples_leaf.max(1) {
            continue;
        }

        pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let mut total_counts = vec![0u64; n_classes];
        for &(_, label) in pairs.iter() {
            total_counts[label as usize] += 1;
        }
        let parent_gini = gini(&total_counts, n as u64);
        if parent_gini == 0.0 {
            // Pure on this feature's subset: nothing to gain.
            continue;
        }

        let mut left_counts = vec![0u64; n_classes];
        for i in 0..n - 1 {
            left_counts[pairs[i].1 as usize] += 1;

            // Only split between distinct values.
            if pairs[i].0 == pairs[i + 1].0 {
                continue;
            }

            let n_left = i + 1;
            let n_right = n - n_left;
            if n_left < min_samples_leaf || n_right < min_samples_leaf {
                continue;
            }

            let right_counts: Vec<u64> = total_counts
                .iter()
                .zip(&left_counts)
                .map(|(&t, &l)| t - l)
                .collect();

            let weighted = (n_left as f64 * gini(&left_counts, n_left as u64)
                + n_right as f64 * gini(&right_counts, n_right as u64))
                / n as f64;
            let gain = parent_gini - weighted;

            if gain > 0.0 && best.map_or(true, |b| gain > b.gain) {
                let threshold = midpoint(pairs[i].0, pairs[i + 1].0);
                best = Some(SplitCandidate {
                    feature,
                    threshold,
                    gain,
                });
            }
        }
    }

    best
}

/// Midpoint between two adjacent values; falls back to the upper value when
/// the average rounds onto the lower one (denormal-scale gaps).
#[inline]
fn midpoint(lo: f32, hi: f32) -> f32 {
    let mid = (lo + hi) / 2.0;
    if mid > lo {
        mid
    } else {
        hi
    }
}
