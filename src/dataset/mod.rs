//! Dataset types for the classification pipeline.
//!
//! This module provides [`Dataset`], the cleaned-sample container consumed by
//! the trainers, together with the label set and per-feature metadata.
//!
//! # Key Types
//!
//! - [`ActivityClass`]: The five posture/movement labels
//! - [`Dataset`]: Features, labels, and schema for a set of samples
//! - [`DatasetSchema`] / [`FeatureMeta`]: Feature names
//! - [`SampleAccessor`]: Per-sample feature access for tree traversal
//!
//! # Storage Layout
//!
//! Features are stored in **feature-major** layout: `[n_features, n_samples]`.
//! Each feature's values across all samples are contiguous in memory, which
//! is what split search scans during training.
//!
//! # Example
//!
//! ```
//! use stance::dataset::{ActivityClass, Dataset, DatasetSchema};
//! use ndarray::array;
//!
//! // 2 features, 3 samples
//! let features = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
//! let labels = vec![0u32, 1, 0];
//! let ds = Dataset::new(features, labels, DatasetSchema::unnamed(2)).unwrap();
//!
//! assert_eq!(ds.n_samples(), 3);
//! assert_eq!(ds.n_features(), 2);
//! assert_eq!(ActivityClass::COUNT, 5);
//! ```

mod dataset;
mod error;
mod label;
mod schema;

pub use dataset::{Dataset, SampleAccessor, SampleView};
pub use error::DatasetError;
pub use label::ActivityClass;
pub use schema::{DatasetSchema, FeatureMeta};
