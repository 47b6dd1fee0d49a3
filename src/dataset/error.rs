//! Error types for loading and assembling datasets.

use thiserror::Error;

/// Errors from CSV ingestion and dataset construction.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("label column '{name}' not found in header")]
    MissingLabelColumn { name: String },

    #[error("row {row}: unknown class label '{value}'")]
    UnknownClassLabel { row: usize, value: String },

    #[error("row {row}, column '{column}': '{value}' is not a number")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}: expected {expected} fields, got {got}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("input contains no data rows")]
    EmptyTable,

    #[error(
        "shape mismatch: {n_features} features x {n_samples} samples, but {n_labels} labels"
    )]
    ShapeMismatch {
        n_features: usize,
        n_samples: usize,
        n_labels: usize,
    },

    #[error("label index {index} out of range for {n_classes} classes")]
    LabelOutOfRange { index: u32, n_classes: usize },
}
