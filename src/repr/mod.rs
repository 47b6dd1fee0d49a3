//! Model representations, separated from training.
//!
//! - [`Tree`]: SoA decision-tree storage with NaN-aware traversal
//! - [`Forest`]: tree collection with vote aggregation
//! - [`SoftmaxModel`]: multinomial linear model (the meta-classifier)
//!
//! Trainers in [`training`](crate::training) produce these; they only know
//! how to predict.

mod forest;
mod linear;
mod tree;

pub use forest::Forest;
pub use linear::{softmax_inplace, SoftmaxModel};
pub use tree::Tree;
