//! Random-forest induction.
//!
//! Bagged CART: every tree trains on a bootstrap sample of the rows and
//! considers a fresh feature subset of width `mtry` at every split. The two
//! base models of the stacked ensemble are instances of this trainer that
//! differ only in `mtry`.
//!
//! # Key Types
//!
//! - [`RandomForestParams`] / [`Mtry`]: configuration
//! - [`RandomForestTrainer`]: produces a [`Forest`](crate::repr::Forest)
//! - [`RandomForestFit`]: trained forest plus the out-of-bag error estimate
//!
//! Sampling ([`BootstrapSampler`], [`FeatureSampler`]) and split search
//! ([`best_split`]) are exposed for reuse and testing.

mod grower;
mod sampling;
mod split;
mod trainer;

pub use sampling::{BootstrapSample, BootstrapSampler, FeatureSampler};
pub use split::{best_split, SplitCandidate};
pub use trainer::{Mtry, RandomForestFit, RandomForestParams, RandomForestTrainer};
