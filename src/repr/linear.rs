//! Multinomial linear model.

use ndarray::{Array1, Array2, ArrayView2, Axis};

use super::tree::argmax;

/// Apply softmax in-place to one sample's logits.
#[inline]
pub fn softmax_inplace(row: &mut [f32]) {
    if row.is_empty() {
        return;
    }

    // Find max for numerical stability
    let max_val = row.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

    let mut sum = 0.0f32;
    for x in row.iter_mut() {
        *x = (*x - max_val).exp();
        sum += *x;
    }

    if sum > 0.0 {
        for x in row.iter_mut() {
            *x /= sum;
        }
    }
}

/// Multinomial softmax classifier: per-class weights and bias.
///
/// Logits for a sample are `weights . x + bias`; probabilities are their
/// softmax. Trained by [`SoftmaxTrainer`](crate::training::SoftmaxTrainer).
#[derive(Clone, Debug)]
pub struct SoftmaxModel {
    /// `[n_classes, n_features]`
    weights: Array2<f32>,
    /// One bias per class.
    bias: Array1<f32>,
}

impl SoftmaxModel {
    /// Create a zero-initialized model.
    pub fn zeros(n_features: usize, n_classes: usize) -> Self {
        Self {
            weights: Array2::zeros((n_classes, n_features)),
            bias: Array1::zeros(n_classes),
        }
    }

    /// Number of input features.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.weights.ncols()
    }

    /// Number of classes.
    #[inline]
    pub fn n_classes(&self) -> usize {
        self.weights.nrows()
    }

    /// Weight matrix `[n_classes, n_features]`.
    #[inline]
    pub fn weights(&self) -> &Array2<f32> {
        &self.weights
    }

    /// Mutable weight matrix, for the trainer.
    #[inline]
    pub fn weights_mut(&mut self) -> &mut Array2<f32> {
        &mut self.weights
    }

    /// Per-class biases.
    #[inline]
    pub fn bias(&self) -> &Array1<f32> {
        &self.bias
    }

    /// Mutable biases, for the trainer.
    #[inline]
    pub fn bias_mut(&mut self) -> &mut Array1<f32> {
        &mut self.bias
    }

    /// Set one class's bias.
    #[inline]
    pub fn set_bias(&mut self, class: usize, value: f32) {
        self.bias[class] = value;
    }

    /// Raw logits, shape `[n_classes, n_samples]`.
    ///
    /// `features` is feature-major `[n_features, n_samples]`.
    pub fn predict_logits(&self, features: ArrayView2<'_, f32>) -> Array2<f32> {
        let mut logits = self.weights.dot(&features);
        logits += &self.bias.view().insert_axis(Axis(1));
        logits
    }

    /// Class probabilities, shape `[n_classes, n_samples]`.
    pub fn predict_proba(&self, features: ArrayView2<'_, f32>) -> Array2<f32> {
        let mut probs = self.predict_logits(features);
        for s in 0..probs.ncols() {
            let mut col: Vec<f32> = probs.column(s).to_vec();
            softmax_inplace(&mut col);
            for (c, v) in col.into_iter().enumerate() {
                probs[[c, s]] = v;
            }
        }
        probs
    }

    /// Argmax class per sample.
    pub fn predict_class(&self, features: ArrayView2<'_, f32>) -> Vec<u32> {
        let logits = self.predict_logits(features);
        (0..logits.ncols())
            .map(|s| argmax(&logits.column(s).to_vec()))
            .collect()
    }
}
