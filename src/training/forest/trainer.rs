//! Random-forest trainer.

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::repr::Forest;
use crate::training::{MetricValue, TrainingLogger, Verbosity};
use crate::utils::Parallelism;

use super::grower::TreeGrower;
use super::sampling::BootstrapSampler;

/// Per-tree seed spacing (golden ratio).
const SEED_MIX: u64 = 0x9E3779B97F4A7C15;

// =============================================================================
// Mtry
// =============================================================================

/// Feature-subsample width per split.
///
/// The one knob that differs between the two base models of the stacked
/// ensemble: the narrow model uses `Sqrt`, the wide model `Half`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mtry {
    /// `floor(sqrt(n_features))`, the classic forest default.
    #[default]
    Sqrt,
    /// `n_features / 2`.
    Half,
    /// An explicit width.
    Fixed(u32),
}

impl Mtry {
    /// Resolve to a concrete width, clamped to `[1, n_features]`.
    pub fn resolve(self, n_features: usize) -> u32 {
        let raw = match self {
            Mtry::Sqrt => (n_features as f64).sqrt().floor() as u32,
            Mtry::Half => (n_features / 2) as u32,
            Mtry::Fixed(m) => m,
        };
        raw.clamp(1, n_features.max(1) as u32)
    }
}

// =============================================================================
// RandomForestParams
// =============================================================================

/// Parameters for random-forest training.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomForestParams {
    // --- Ensemble size ---
    /// Number of trees.
    pub n_trees: u32,

    // --- Per-split feature subsampling ---
    /// Feature-subsample width per split.
    pub mtry: Mtry,

    // --- Tree structure ---
    /// Maximum tree depth. 0 grows unrestricted trees.
    pub max_depth: u32,
    /// Minimum samples each child of a split must receive.
    pub min_samples_leaf: usize,
    /// Minimum Gini gain to accept a split.
    pub min_gain: f32,

    // --- Bagging ---
    /// Bootstrap draws as a fraction of the row count, in (0, 1].
    pub bootstrap_rate: f32,

    // --- Reproducibility ---
    /// Random seed.
    pub seed: u64,

    // --- Logging ---
    /// Verbosity level for training output.
    pub verbosity: Verbosity,
}

impl Default for RandomForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            mtry: Mtry::default(),
            max_depth: 0,
            min_samples_leaf: 1,
            min_gain: 0.0,
            bootstrap_rate: 1.0,
            seed: 42,
            verbosity: Verbosity::default(),
        }
    }
}

// =============================================================================
// RandomForestTrainer
// =============================================================================

/// A trained forest plus its out-of-bag error estimate.
#[derive(Clone, Debug)]
pub struct RandomForestFit {
    /// The trained forest.
    pub forest: Forest,
    /// Fraction of OOB-covered rows the OOB majority vote got wrong.
    /// `None` when no row was ever out of bag.
    pub oob_error: Option<f64>,
}

/// Random-forest trainer.
pub struct RandomForestTrainer {
    params: RandomForestParams,
}

impl RandomForestTrainer {
    /// Create a new trainer.
    pub fn new(params: RandomForestParams) -> Self {
        Self { params }
    }

    /// Get reference to parameters.
    pub fn params(&self) -> &RandomForestParams {
        &self.params
    }

    /// Train a forest.
    ///
    /// **Note:** This method does NOT create a thread pool. The caller sets
    /// up parallelism via [`run_with_threads`](crate::utils::run_with_threads)
    /// if desired. Per-tree seeds derive from the base seed, so parallel and
    /// sequential training produce identical forests.
    ///
    /// Returns `None` for an empty dataset (no samples or no features).
    pub fn train(&self, dataset: &Dataset, parallelism: Parallelism) -> Option<RandomForestFit> {
        let n_samples = dataset.n_samples();
        let n_features = dataset.n_features();
        if n_samples == 0 || n_features == 0 || self.params.n_trees == 0 {
            return None;
        }

        let mtry = self.params.mtry.resolve(n_features);
        let sampler = BootstrapSampler::new(self.params.bootstrap_rate);

        let logger = TrainingLogger::new("forest", self.params.verbosity);
        logger.start_training(self.params.n_trees as usize);

        // Each tree is independent: bootstrap, grow, score its OOB rows.
        let grown = parallelism.maybe_par_map(0..self.params.n_trees, |t| {
            let tree_seed = self
                .params
                .seed
                .wrapping_add((t as u64).wrapping_mul(SEED_MIX));
            let bootstrap = sampler.sample(n_samples, tree_seed);

            let grower = TreeGrower::new(dataset, &self.params, mtry, tree_seed);
            let tree = grower.grow(&bootstrap.in_bag);

            let oob_votes: Vec<(u32, u32)> = bootstrap
                .oob
                .iter()
                .map(|&row| (row, tree.predict_class(&dataset.sample(row as usize))))
                .collect();
            (tree, oob_votes)
        });

        let n_classes = dataset.n_classes();
        let mut forest = Forest::new(n_classes);
        let mut votes = vec![0u32; n_samples * n_classes];
        for (t, (tree, oob_votes)) in grown.into_iter().enumerate() {
            logger.log_round(t, &format!("{} leaves", tree.n_leaves()));
            for &(row, class) in &oob_votes {
                votes[row as usize * n_classes + class as usize] += 1;
            }
            forest.push_tree(tree);
        }

        let oob_error = oob_error_from_votes(&votes, dataset.labels(), n_classes);
        if let Some(err) = oob_error {
            logger.log_metric(&MetricValue::new("oob-error", err, false));
        }
        logger.finish_training();

        Some(RandomForestFit { forest, oob_error })
    }
}

/// Majority-vote OOB error over rows that received at least one OOB vote.
fn oob_error_from_votes(votes: &[u32], labels: &[u32], n_classes: usize) -> Option<f64> {
    let mut covered = 0u64;
    let mut wrong = 0u64;

    for (row, &label) in labels.iter().enumerate() {
        let row_votes = &votes[row * n_classes..(row + 1) * n_classes];
        if row_votes.iter().all(|&v| v == 0) {
            continue;
        }
        covered += 1;

        let mut best = 0usize;
        for (c, &v) in row_votes.iter().enumerate().skip(1) {
            if v > row_votes[best] {
                best = c;
            }
        }
        if best as u32 != label {
            wrong += 1;
        }
    }

    if covered == 0 {
        None
    } else {
        Some(wrong as f64 / covered as f64)
    }
}
