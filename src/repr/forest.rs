//! Tree collections and vote aggregation.

use ndarray::{Array2, ArrayView2};

use crate::dataset::SampleAccessor;
use crate::utils::Parallelism;

use super::tree::{argmax, Tree};

/// One sample of a borrowed feature-major matrix.
struct ColumnSample<'a, 'v> {
    features: &'a ArrayView2<'v, f32>,
    sample: usize,
}

impl SampleAccessor for ColumnSample<'_, '_> {
    #[inline]
    fn feature(&self, index: usize) -> f32 {
        self.features[[index, self.sample]]
    }
}

/// A trained forest: independent classification trees voting per sample.
///
/// Prediction is a majority vote over the trees' predicted classes; the
/// per-class vote fractions are exposed for callers that want them (e.g.
/// probability-level stacking).
#[derive(Clone, Debug)]
pub struct Forest {
    n_classes: u32,
    trees: Vec<Tree>,
}

impl Forest {
    /// Create an empty forest.
    pub fn new(n_classes: usize) -> Self {
        Self {
            n_classes: n_classes as u32,
            trees: Vec::new(),
        }
    }

    /// Append a trained tree.
    ///
    /// # Panics
    ///
    /// Panics if the tree's class count differs from the forest's.
    pub fn push_tree(&mut self, tree: Tree) {
        assert_eq!(
            tree.n_classes(),
            self.n_classes as usize,
            "tree class count mismatch"
        );
        self.trees.push(tree);
    }

    /// Number of trees.
    #[inline]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Number of classes.
    #[inline]
    pub fn n_classes(&self) -> usize {
        self.n_classes as usize
    }

    /// The trees in training order.
    #[inline]
    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    /// Per-class vote fractions, shape `[n_classes, n_samples]`.
    ///
    /// `features` is feature-major `[n_features, n_samples]`. Samples are
    /// scored rayon-parallel when `parallelism` allows.
    pub fn vote_fractions(
        &self,
        features: ArrayView2<'_, f32>,
        parallelism: Parallelism,
    ) -> Array2<f32> {
        let n_samples = features.ncols();
        let n_classes = self.n_classes as usize;
        let n_trees = self.trees.len().max(1) as f32;

        let columns = parallelism.maybe_par_map(0..n_samples, |s| {
            let sample = ColumnSample {
                features: &features,
                sample: s,
            };
            let mut votes = vec![0.0f32; n_classes];
            for tree in &self.trees {
                votes[tree.predict_class(&sample) as usize] += 1.0;
            }
            for v in votes.iter_mut() {
                *v /= n_trees;
            }
            votes
        });

        let mut fractions = Array2::zeros((n_classes, n_samples));
        for (s, votes) in columns.into_iter().enumerate() {
            for (c, v) in votes.into_iter().enumerate() {
                fractions[[c, s]] = v;
            }
        }
        fractions
    }

    /// Majority-vote class per sample.
    pub fn predict_class(
        &self,
        features: ArrayView2<'_, f32>,
        parallelism: Parallelism,
    ) -> Vec<u32> {
        let fractions = self.vote_fractions(features, parallelism);
        (0..fractions.ncols())
            .map(|s| argmax(&fractions.column(s).to_vec()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn leaf_tree(n_classes: usize, class: u32) -> Tree {
        let mut tree = Tree::new(n_classes);
        let mut probs = vec![0.0; n_classes];
        probs[class as usize] = 1.0;
        tree.push_leaf(&probs);
        tree
    }

    fn threshold_tree(n_classes: usize, feature: u32, threshold: f32, lo: u32, hi: u32) -> Tree {
        let mut tree = Tree::new(n_classes);
        let root = tree.push_split(feature, threshold, true);
        let mut lo_probs = vec![0.0; n_classes];
        lo_probs[lo as usize] = 1.0;
        let mut hi_probs = vec![0.0; n_classes];
        hi_probs[hi as usize] = 1.0;
        let l = tree.push_leaf(&lo_probs);
        let r = tree.push_leaf(&hi_probs);
        tree.set_children(root, l, r);
        tree
    }

    #[test]
    fn majority_vote() {
        let mut forest = Forest::new(2);
        forest.push_tree(leaf_tree(2, 0));
        forest.push_tree(leaf_tree(2, 1));
        forest.push_tree(leaf_tree(2, 1));

        // 1 feature, 2 samples
        let features = array![[0.0f32, 1.0]];
        let pred = forest.predict_class(features.view(), Parallelism::Sequential);
        assert_eq!(pred, vec![1, 1]);

        let fractions = forest.vote_fractions(features.view(), Parallelism::Sequential);
        assert!((fractions[[0, 0]] - 1.0 / 3.0).abs() < 1e-6);
        assert!((fractions[[1, 0]] - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn votes_depend_on_features() {
        let mut forest = Forest::new(2);
        forest.push_tree(threshold_tree(2, 0, 0.5, 0, 1));

        let features = array![[0.0f32, 1.0]];
        let pred = forest.predict_class(features.view(), Parallelism::Sequential);
        assert_eq!(pred, vec![0, 1]);
    }

    #[test]
    fn parallel_matches_sequential() {
        let mut forest = Forest::new(3);
        forest.push_tree(threshold_tree(3, 0, 0.5, 0, 1));
        forest.push_tree(threshold_tree(3, 1, 0.0, 1, 2));
        forest.push_tree(leaf_tree(3, 2));

        let features = array![
            [0.0f32, 1.0, 0.2, 0.9],
            [-1.0, 1.0, 0.5, -0.5],
        ];
        let seq = forest.vote_fractions(features.view(), Parallelism::Sequential);
        let par = forest.vote_fractions(features.view(), Parallelism::Parallel);
        assert_eq!(seq, par);
    }

    #[test]
    #[should_panic(expected = "tree class count mismatch")]
    fn rejects_mismatched_tree() {
        let mut forest = Forest::new(2);
        forest.push_tree(leaf_tree(3, 0));
    }
}
