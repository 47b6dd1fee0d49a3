//! CART growing for a single tree.

use crate::dataset::Dataset;
use crate::repr::Tree;

use super::sampling::FeatureSampler;
use super::split::best_split;
use super::trainer::RandomForestParams;

/// Grows one classification tree over a bootstrap sample.
///
/// Greedy depth-first CART: at every node, draw `mtry` candidate features,
/// take the best Gini split, and recurse. Missing values go to the child
/// that received the majority of the node's samples; that direction is
/// recorded on the node for prediction time.
pub(crate) struct TreeGrower<'a> {
    dataset: &'a Dataset,
    params: &'a RandomForestParams,
    feature_sampler: FeatureSampler,
    tree_seed: u64,
}

impl<'a> TreeGrower<'a> {
    pub fn new(
        dataset: &'a Dataset,
        params: &'a RandomForestParams,
        mtry: u32,
        tree_seed: u64,
    ) -> Self {
        Self {
            dataset,
            params,
            feature_sampler: FeatureSampler::new(dataset.n_features() as u32, mtry),
            tree_seed,
        }
    }

    /// Grow a tree over the given (bootstrap) sample indices.
    pub fn grow(&self, in_bag: &[u32]) -> Tree {
        let mut tree = Tree::new(self.dataset.n_classes());
        self.grow_node(&mut tree, in_bag.to_vec(), 0);
        tree
    }

    fn grow_node(&self, tree: &mut Tree, indices: Vec<u32>, depth: u32) -> u32 {
        let counts = self.class_counts(&indices);
        let n_present = counts.iter().filter(|&&c| c > 0).count();

        let depth_capped = self.params.max_depth > 0 && depth >= self.params.max_depth;
        let too_small = indices.len() < 2 * self.params.min_samples_leaf.max(1);
        if n_present <= 1 || depth_capped || too_small {
            return tree.push_leaf(&normalize(&counts));
        }

        // The next node id seeds this node's feature draw.
        let node_id = tree.n_nodes() as u32;
        let features = self
            .feature_sampler
            .sample_for_node(node_id, self.tree_seed);

        let candidate = best_split(
            self.dataset,
            &indices,
            &features,
            self.dataset.n_classes(),
            self.params.min_samples_leaf,
        );
        let candidate = match candidate {
            Some(c) if c.gain > self.params.min_gain as f64 => c,
            _ => return tree.push_leaf(&normalize(&counts)),
        };

        // Partition non-missing values; missing follows the larger side.
        let mut left = Vec::new();
        let mut right = Vec::new();
        let mut missing = Vec::new();
        for &i in &indices {
            let value = self.dataset.value(candidate.feature as usize, i as usize);
            if value.is_nan() {
                missing.push(i);
            } else if value < candidate.threshold {
                left.push(i);
            } else {
                right.push(i);
            }
        }
        drop(indices);

        let default_left = left.len() >= right.len();
        if default_left {
            left.extend_from_slice(&missing);
        } else {
            right.extend_from_slice(&missing);
        }

        let node = tree.push_split(candidate.feature, candidate.threshold, default_left);
        let left_child = self.grow_node(tree, left, depth + 1);
        let right_child = self.grow_node(tree, right, depth + 1);
        tree.set_children(node, left_child, right_child);
        node
    }

    fn class_counts(&self, indices: &[u32]) -> Vec<u64> {
        let labels = self.dataset.labels();
        let mut counts = vec![0u64; self.dataset.n_classes()];
        for &i in indices {
            counts[labels[i as usize] as usize] += 1;
        }
        counts
    }
}

/// Counts to a probability distribution; uniform for an empty node.
fn normalize(counts: &[u64]) -> Vec<f32> {
    let total: u64 = counts.iter().sum();
    if total == 0 {
        return vec![1.0 / counts.len() as f32; counts.len()];
    }
    counts.iter().map(|&c| c as f32 / total as f32).collect()
}
