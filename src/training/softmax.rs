//! Multinomial logistic regression trainer.
//!
//! The stacking meta-classifier: full-batch gradient descent on the softmax
//! cross-entropy objective, biases initialized to class log-priors, weights
//! L2-regularized (biases are not).

use ndarray::{Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::repr::SoftmaxModel;
use crate::training::{MetricValue, TrainingLogger, Verbosity};

// ============================================================================
// SoftmaxParams
// ============================================================================

/// Parameters for softmax-regression training.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SoftmaxParams {
    /// Number of gradient-descent rounds.
    pub n_rounds: u32,
    /// Step size.
    pub learning_rate: f32,
    /// L2 regularization on the weights.
    pub lambda: f32,
    /// Verbosity level for training output.
    pub verbosity: Verbosity,
}

impl Default for SoftmaxParams {
    fn default() -> Self {
        Self {
            n_rounds: 200,
            learning_rate: 0.5,
            lambda: 1e-4,
            verbosity: Verbosity::default(),
        }
    }
}

// ============================================================================
// SoftmaxTrainer
// ============================================================================

/// Multinomial softmax-regression trainer.
#[derive(Clone, Debug)]
pub struct SoftmaxTrainer {
    n_classes: usize,
    params: SoftmaxParams,
}

impl SoftmaxTrainer {
    /// Create a trainer for `n_classes` classes.
    pub fn new(n_classes: usize, params: SoftmaxParams) -> Self {
        Self { n_classes, params }
    }

    /// Get reference to parameters.
    pub fn params(&self) -> &SoftmaxParams {
        &self.params
    }

    /// Train a model.
    ///
    /// `features` is feature-major `[n_features, n_samples]`; `labels` are
    /// class indices. Returns `None` for empty input or a label/shape
    /// mismatch.
    pub fn train(&self, features: ArrayView2<'_, f32>, labels: &[u32]) -> Option<SoftmaxModel> {
        let (n_features, n_samples) = features.dim();
        if n_samples == 0 || labels.len() != n_samples {
            return None;
        }
        if labels.iter().any(|&l| l as usize >= self.n_classes) {
            return None;
        }

        // One-hot targets, [n_classes, n_samples].
        let mut targets = Array2::<f32>::zeros((self.n_classes, n_samples));
        for (s, &label) in labels.iter().enumerate() {
            targets[[label as usize, s]] = 1.0;
        }

        let mut model = SoftmaxModel::zeros(n_features, self.n_classes);
        self.init_bias_to_log_priors(&mut model, labels, n_samples);

        let logger = TrainingLogger::new("softmax", self.params.verbosity);
        logger.start_training(self.params.n_rounds as usize);

        let inv_n = 1.0 / n_samples as f32;
        for round in 0..self.params.n_rounds {
            let probs = model.predict_proba(features);
            let mut diff = probs;
            diff -= &targets;

            // Weight gradient: diff . X^T / n + lambda * W
            let mut grad_w = diff.dot(&features.t());
            grad_w.mapv_inplace(|v| v * inv_n);
            grad_w.scaled_add(self.params.lambda, model.weights());

            // Bias gradient: row means of diff (unregularized).
            let mut grad_b = diff.sum_axis(Axis(1));
            grad_b.mapv_inplace(|v| v * inv_n);

            model
                .weights_mut()
                .scaled_add(-self.params.learning_rate, &grad_w);
            model
                .bias_mut()
                .scaled_add(-self.params.learning_rate, &grad_b);

            if self.params.verbosity >= Verbosity::Debug {
                let loss = multiclass_log_loss(&model.predict_proba(features), labels);
                logger.log_round(round as usize, &format!("mlogloss {loss:.6}"));
            }
        }

        let loss = multiclass_log_loss(&model.predict_proba(features), labels);
        logger.log_metric(&MetricValue::new("train-mlogloss", loss, false));
        logger.finish_training();

        Some(model)
    }

    /// Each class's bias starts at the log of its prior, so round zero
    /// already predicts the class distribution.
    fn init_bias_to_log_priors(&self, model: &mut SoftmaxModel, labels: &[u32], n_samples: usize) {
        let mut counts = vec![0usize; self.n_classes];
        for &l in labels {
            counts[l as usize] += 1;
        }
        for (class, &count) in counts.iter().enumerate() {
            let p = (count as f64 / n_samples as f64).clamp(1e-7, 1.0 - 1e-7);
            model.set_bias(class, p.ln() as f32);
        }
    }
}

/// Multiclass cross-entropy: -mean(log(p_true_class)).
fn multiclass_log_loss(probs: &Array2<f32>, labels: &[u32]) -> f64 {
    const EPS: f64 = 1e-15;
    if labels.is_empty() {
        return 0.0;
    }
    let sum: f64 = labels
        .iter()
        .enumerate()
        .map(|(s, &label)| {
            let p = (probs[[label as usize, s]] as f64).clamp(EPS, 1.0 - EPS);
            -p.ln()
        })
        .sum();
    sum / labels.len() as f64
}
