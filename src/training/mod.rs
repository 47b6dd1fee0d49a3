//! Training infrastructure.
//!
//! ## Model-Specific Training
//!
//! - [`forest`]: random-forest induction (bagged CART, per-node feature
//!   subsampling, out-of-bag error)
//! - [`softmax`]: multinomial logistic regression via full-batch gradient
//!   descent (the stacking meta-classifier)
//!
//! ## Shared Infrastructure
//!
//! - [`ConfusionMatrix`], [`MetricValue`]: evaluation
//! - [`TrainingLogger`], [`Verbosity`]: progress logging

pub mod forest;
mod logger;
mod metrics;
mod softmax;

pub use forest::{Mtry, RandomForestFit, RandomForestParams, RandomForestTrainer};
pub use logger::{TrainingLogger, Verbosity};
pub use metrics::{ConfusionMatrix, MetricValue};
pub use softmax::{SoftmaxParams, SoftmaxTrainer};
