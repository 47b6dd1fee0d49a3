//! Threshold-based column filtering.

use log::info;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, DatasetError, DatasetSchema};
use crate::io::RawTable;

use super::MissingProfile;

// =============================================================================
// CleaningPolicy
// =============================================================================

/// Column-level cleaning policy.
///
/// Two removals, no imputation:
///
/// 1. The leading `n_identifier_columns` of the raw export are non-sensor
///    columns (row id, subject, timestamps, window markers) and are always
///    dropped.
/// 2. Any column whose missing fraction exceeds `max_missing_fraction` is
///    dropped. The reference export's derived-statistic columns sit at ~98%
///    missing, so the default threshold removes exactly those.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningPolicy {
    /// Leading non-sensor columns to drop unconditionally.
    pub n_identifier_columns: usize,
    /// Drop columns whose missing fraction is strictly above this.
    pub max_missing_fraction: f32,
}

impl Default for CleaningPolicy {
    fn default() -> Self {
        Self {
            n_identifier_columns: 7,
            max_missing_fraction: 0.97,
        }
    }
}

/// What a [`CleaningPolicy`] removed and kept.
#[derive(Clone, Debug)]
pub struct CleaningSummary {
    /// Rows in the raw table.
    pub n_rows: usize,
    /// Non-label columns in the raw table.
    pub n_raw_columns: usize,
    /// Names of dropped leading identifier columns.
    pub dropped_identifiers: Vec<String>,
    /// Names of dropped sparse columns (not already counted as identifiers).
    pub dropped_sparse: Vec<String>,
    /// Missing profile of the raw table.
    pub profile: MissingProfile,
}

impl CleaningSummary {
    /// Columns surviving the policy.
    pub fn n_kept(&self) -> usize {
        self.n_raw_columns - self.dropped_identifiers.len() - self.dropped_sparse.len()
    }
}

impl CleaningPolicy {
    /// Apply the policy, producing the cleaned [`Dataset`].
    ///
    /// The label column was split out at load time, so it can never be
    /// dropped here.
    pub fn apply(&self, table: &RawTable) -> Result<(Dataset, CleaningSummary), DatasetError> {
        let profile = MissingProfile::from_table(table);
        let n_id = self.n_identifier_columns.min(table.n_columns());

        let sparse: Vec<usize> = profile
            .sparse_columns(self.max_missing_fraction)
            .into_iter()
            .filter(|&c| c >= n_id)
            .collect();

        let kept: Vec<usize> = (n_id..table.n_columns())
            .filter(|c| !sparse.contains(c))
            .collect();

        let n_rows = table.n_rows();
        let mut flat = Vec::with_capacity(kept.len() * n_rows);
        for &c in &kept {
            flat.extend_from_slice(table.column(c));
        }
        let features = Array2::from_shape_vec((kept.len(), n_rows), flat)
            .expect("kept columns are rectangular");

        let schema = DatasetSchema::from_names(kept.iter().map(|&c| table.name(c).to_string()));
        let dataset = Dataset::new(features, table.labels().to_vec(), schema)?;

        let summary = CleaningSummary {
            n_rows,
            n_raw_columns: table.n_columns(),
            dropped_identifiers: (0..n_id).map(|c| table.name(c).to_string()).collect(),
            dropped_sparse: sparse.iter().map(|&c| table.name(c).to_string()).collect(),
            profile,
        };
        info!(
            "cleaning kept {} of {} columns ({} identifier, {} sparse dropped)",
            summary.n_kept(),
            summary.n_raw_columns,
            summary.dropped_identifiers.len(),
            summary.dropped_sparse.len()
        );

        Ok((dataset, summary))
    }
}
