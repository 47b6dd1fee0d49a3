//! stance: posture and movement classification from wearable sensor data.
//!
//! Loads a raw accelerometer recording (CSV export), drops sparse and
//! identifier columns, partitions the samples with a stratified holdout,
//! trains two random forests that differ only in per-split feature-subsample
//! width, stacks them with a multinomial softmax meta-classifier, and
//! reports accuracy, Cohen's Kappa, and confusion matrices.
//!
//! # Key Types
//!
//! - [`Dataset`] / [`ActivityClass`] - Cleaned samples and the label set
//! - [`CleaningPolicy`] / [`MissingProfile`] - Column-level cleaning
//! - [`RandomForestTrainer`] / [`RandomForestParams`] - Base model training
//! - [`SoftmaxTrainer`] / [`SoftmaxParams`] - Meta-classifier training
//! - [`StackedEnsemble`] - The two-forest + meta-model combination
//! - [`EvalReport`] - Pipeline output (metrics, confusion matrices)
//!
//! # Pipeline
//!
//! Use [`pipeline::run`] for the end-to-end flow, or compose the stages
//! directly:
//!
//! ```ignore
//! use stance::{pipeline, PipelineParams, Parallelism};
//!
//! let params = PipelineParams::default();
//! let report = pipeline::run("dataset.csv".as_ref(), &params, Parallelism::Parallel)?;
//! println!("{report}");
//! ```

pub mod clean;
pub mod dataset;
pub mod io;
pub mod pipeline;
pub mod repr;
pub mod split;
pub mod stacking;
pub mod training;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

// Data handling
pub use dataset::{ActivityClass, Dataset, DatasetError, DatasetSchema, FeatureMeta, SampleAccessor};

// Cleaning
pub use clean::{CleaningPolicy, CleaningSummary, MissingProfile};

// Partitioning
pub use split::stratified_split;

// Model representations
pub use repr::{Forest, SoftmaxModel, Tree};

// Training types
pub use training::{
    ConfusionMatrix, MetricValue, Mtry, RandomForestFit, RandomForestParams, RandomForestTrainer,
    SoftmaxParams, SoftmaxTrainer, TrainingLogger, Verbosity,
};

// Stacking and pipeline
pub use pipeline::{EvalReport, PipelineError, PipelineParams};
pub use stacking::{StackedEnsemble, StackingParams};

// Shared utilities
pub use utils::{run_with_threads, Parallelism};
