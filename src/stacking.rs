//! Two base forests stacked under a multinomial meta-classifier.
//!
//! The ensemble trains two random forests that differ only in per-split
//! feature-subsample width, then fits a softmax meta-model on the one-hot
//! encoding of their predicted classes. At prediction time the bases vote,
//! their classes are one-hot encoded the same way, and the meta-model has
//! the final word.

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::repr::{Forest, SoftmaxModel};
use crate::training::{
    Mtry, RandomForestParams, RandomForestTrainer, SoftmaxParams, SoftmaxTrainer,
};
use crate::utils::Parallelism;

// =============================================================================
// StackingParams
// =============================================================================

/// Parameters for the stacked ensemble.
///
/// The two base forests are configured independently; by default they are
/// identical except for `mtry` (sqrt-width vs half-width). When
/// deserializing, fields omitted inside a forest override fall back to the
/// plain forest defaults, including the sqrt width.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StackingParams {
    /// The sqrt-width base forest.
    pub narrow: RandomForestParams,
    /// The half-width base forest.
    pub wide: RandomForestParams,
    /// The softmax meta-classifier.
    pub meta: SoftmaxParams,
}

impl Default for StackingParams {
    fn default() -> Self {
        Self {
            narrow: RandomForestParams::default(),
            wide: RandomForestParams {
                mtry: Mtry::Half,
                ..Default::default()
            },
            meta: SoftmaxParams::default(),
        }
    }
}

// =============================================================================
// StackedEnsemble
// =============================================================================

/// A trained stacked ensemble plus its base models' OOB estimates.
#[derive(Clone, Debug)]
pub struct StackedFit {
    /// The trained ensemble.
    pub ensemble: StackedEnsemble,
    /// OOB error of the narrow base forest.
    pub narrow_oob: Option<f64>,
    /// OOB error of the wide base forest.
    pub wide_oob: Option<f64>,
}

/// Two base forests and the softmax meta-model over their predictions.
#[derive(Clone, Debug)]
pub struct StackedEnsemble {
    narrow: Forest,
    wide: Forest,
    meta: SoftmaxModel,
    n_classes: usize,
}

impl StackedEnsemble {
    /// Train the full ensemble on `dataset`.
    ///
    /// Both forests fit the same samples; the meta-model fits the one-hot
    /// encoding of their training-partition predictions. Returns `None` when
    /// any stage rejects its input (empty data, zero trees).
    pub fn train(
        dataset: &Dataset,
        params: &StackingParams,
        parallelism: Parallelism,
    ) -> Option<StackedFit> {
        let narrow_fit =
            RandomForestTrainer::new(params.narrow.clone()).train(dataset, parallelism)?;
        let wide_fit = RandomForestTrainer::new(params.wide.clone()).train(dataset, parallelism)?;

        let narrow_pred = narrow_fit
            .forest
            .predict_class(dataset.features(), parallelism);
        let wide_pred = wide_fit
            .forest
            .predict_class(dataset.features(), parallelism);

        let n_classes = dataset.n_classes();
        let meta_features = one_hot_meta_features(&narrow_pred, &wide_pred, n_classes);
        let meta = SoftmaxTrainer::new(n_classes, params.meta.clone())
            .train(meta_features.view(), dataset.labels())?;

        Some(StackedFit {
            ensemble: StackedEnsemble {
                narrow: narrow_fit.forest,
                wide: wide_fit.forest,
                meta,
                n_classes,
            },
            narrow_oob: narrow_fit.oob_error,
            wide_oob: wide_fit.oob_error,
        })
    }

    /// Number of classes.
    #[inline]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// The narrow (sqrt-width) base forest.
    #[inline]
    pub fn narrow(&self) -> &Forest {
        &self.narrow
    }

    /// The wide (half-width) base forest.
    #[inline]
    pub fn wide(&self) -> &Forest {
        &self.wide
    }

    /// The softmax meta-model.
    #[inline]
    pub fn meta(&self) -> &SoftmaxModel {
        &self.meta
    }

    /// Each base forest's predicted classes, `(narrow, wide)`.
    ///
    /// `features` is feature-major `[n_features, n_samples]`.
    pub fn base_predictions(
        &self,
        features: ArrayView2<'_, f32>,
        parallelism: Parallelism,
    ) -> (Vec<u32>, Vec<u32>) {
        (
            self.narrow.predict_class(features, parallelism),
            self.wide.predict_class(features, parallelism),
        )
    }

    /// Stacked prediction: base votes, one-hot encode, meta-model argmax.
    pub fn predict_class(
        &self,
        features: ArrayView2<'_, f32>,
        parallelism: Parallelism,
    ) -> Vec<u32> {
        let (narrow_pred, wide_pred) = self.base_predictions(features, parallelism);
        let meta_features = one_hot_meta_features(&narrow_pred, &wide_pred, self.n_classes);
        self.meta.predict_class(meta_features.view())
    }
}

/// One-hot encode two base models' predicted classes as meta-features.
///
/// Feature-major `[2 * n_classes, n_samples]`: the first `n_classes` rows
/// encode the first model's prediction, the rest the second's.
pub fn one_hot_meta_features(first: &[u32], second: &[u32], n_classes: usize) -> Array2<f32> {
    assert_eq!(first.len(), second.len(), "prediction length mismatch");
    let n_samples = first.len();
    let mut features = Array2::<f32>::zeros((2 * n_classes, n_samples));
    for (s, (&a, &b)) in first.iter().zip(second).enumerate() {
        features[[a as usize, s]] = 1.0;
        features[[n_classes + b as usize, s]] = 1.0;
    }
    features
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetSchema;
    use ndarray::Array2;
    use rand::prelude::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    /// Five well-separated clusters in three features.
    fn clustered_dataset(n_per_class: usize, seed: u64) -> Dataset {
        let centers = [
            (-6.0f32, -6.0f32, 0.0f32),
            (-3.0, 6.0, 1.0),
            (0.0, -6.0, 2.0),
            (3.0, 6.0, 3.0),
            (6.0, -6.0, 4.0),
        ];
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

        let n = n_per_class * centers.len();
        let mut features = Array2::<f32>::zeros((3, n));
        let mut labels = Vec::with_capacity(n);
        for (class, &(cx, cy, cz)) in centers.iter().enumerate() {
            for i in 0..n_per_class {
                let s = class * n_per_class + i;
                features[[0, s]] = cx + rng.gen_range(-1.0..1.0);
                features[[1, s]] = cy + rng.gen_range(-1.0..1.0);
                features[[2, s]] = cz + rng.gen_range(-0.3..0.3);
                labels.push(class as u32);
            }
        }
        Dataset::new(features, labels, DatasetSchema::unnamed(3)).unwrap()
    }

    fn small_params() -> StackingParams {
        let mut params = StackingParams::default();
        params.narrow.n_trees = 15;
        params.wide.n_trees = 15;
        params
    }

    #[test]
    fn default_params_differ_only_in_mtry() {
        let params = StackingParams::default();
        assert_eq!(params.narrow.mtry, Mtry::Sqrt);
        assert_eq!(params.wide.mtry, Mtry::Half);
        assert_eq!(params.narrow.n_trees, params.wide.n_trees);
        assert_eq!(params.narrow.seed, params.wide.seed);
    }

    #[test]
    fn one_hot_layout() {
        let features = one_hot_meta_features(&[0, 2], &[1, 1], 3);
        assert_eq!(features.dim(), (6, 2));
        // Sample 0: narrow predicted 0, wide predicted 1.
        assert_eq!(features.column(0).to_vec(), vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
        // Sample 1: narrow predicted 2, wide predicted 1.
        assert_eq!(features.column(1).to_vec(), vec![0.0, 0.0, 1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn learns_separable_clusters() {
        let ds = clustered_dataset(24, 11);
        let fit = StackedEnsemble::train(&ds, &small_params(), Parallelism::Sequential).unwrap();

        assert_eq!(fit.ensemble.narrow().n_trees(), 15);
        assert_eq!(fit.ensemble.wide().n_trees(), 15);
        assert!(fit.narrow_oob.is_some());
        assert!(fit.wide_oob.is_some());

        let pred = fit
            .ensemble
            .predict_class(ds.features(), Parallelism::Sequential);
        let correct = pred
            .iter()
            .zip(ds.labels())
            .filter(|(p, l)| p == l)
            .count();
        assert!(correct as f64 / pred.len() as f64 > 0.95);
    }

    #[test]
    fn stacked_agrees_with_unanimous_bases() {
        let ds = clustered_dataset(24, 4);
        let fit = StackedEnsemble::train(&ds, &small_params(), Parallelism::Sequential).unwrap();

        let (narrow, wide) = fit
            .ensemble
            .base_predictions(ds.features(), Parallelism::Sequential);
        let stacked = fit
            .ensemble
            .predict_class(ds.features(), Parallelism::Sequential);
        for ((&n, &w), &s) in narrow.iter().zip(&wide).zip(&stacked) {
            if n == w {
                assert_eq!(s, n, "meta-model overruled unanimous bases");
            }
        }
    }

    #[test]
    fn reproducible_for_same_params() {
        let ds = clustered_dataset(16, 8);
        let params = small_params();
        let a = StackedEnsemble::train(&ds, &params, Parallelism::Sequential).unwrap();
        let b = StackedEnsemble::train(&ds, &params, Parallelism::Parallel).unwrap();

        assert_eq!(a.narrow_oob, b.narrow_oob);
        assert_eq!(a.wide_oob, b.wide_oob);
        let pred_a = a
            .ensemble
            .predict_class(ds.features(), Parallelism::Sequential);
        let pred_b = b
            .ensemble
            .predict_class(ds.features(), Parallelism::Sequential);
        assert_eq!(pred_a, pred_b);
    }

    #[test]
    fn empty_dataset_is_rejected() {
        let ds = Dataset::new(Array2::<f32>::zeros((0, 0)), vec![], DatasetSchema::unnamed(0))
            .unwrap();
        assert!(StackedEnsemble::train(&ds, &small_params(), Parallelism::Sequential).is_none());
    }
}
