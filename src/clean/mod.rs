//! Missing-value analysis and column-level cleaning.
//!
//! The raw export is bimodal: most columns are fully observed sensor
//! readings, while derived-statistic columns are populated only on window
//! boundaries and are ~98% missing. Cleaning is therefore a column-level
//! decision - no imputation:
//!
//! - [`MissingProfile`] measures the per-column missing fraction and the
//!   distinct missingness levels (the pattern analysis).
//! - [`CleaningPolicy`] drops columns above a missing-fraction threshold and
//!   the leading identifier columns (row ids, subject, timestamps, window
//!   markers), yielding the numeric sensor [`Dataset`](crate::dataset::Dataset).

mod missing;
mod policy;

pub use missing::MissingProfile;
pub use policy::{CleaningPolicy, CleaningSummary};
