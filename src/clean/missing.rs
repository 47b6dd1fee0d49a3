//! Per-column missing-value profile.

use std::fmt;

use crate::io::RawTable;

/// Missing fractions per column of a [`RawTable`].
///
/// Also summarizes the distinct missingness levels observed: in the
/// reference data every column is either ~complete or ~98% missing, and
/// [`levels`](Self::levels) makes that pattern visible before filtering.
#[derive(Clone, Debug)]
pub struct MissingProfile {
    fractions: Vec<f32>,
    n_rows: usize,
}

impl MissingProfile {
    /// Profile every column of the table.
    pub fn from_table(table: &RawTable) -> Self {
        let n_rows = table.n_rows();
        let fractions = (0..table.n_columns())
            .map(|c| {
                if n_rows == 0 {
                    return 0.0;
                }
                let missing = table.column(c).iter().filter(|v| v.is_nan()).count();
                missing as f32 / n_rows as f32
            })
            .collect();
        Self { fractions, n_rows }
    }

    /// Number of profiled columns.
    #[inline]
    pub fn n_columns(&self) -> usize {
        self.fractions.len()
    }

    /// Number of rows the profile was computed over.
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Missing fraction of one column, in `[0, 1]`.
    #[inline]
    pub fn fraction(&self, column: usize) -> f32 {
        self.fractions[column]
    }

    /// Columns with no missing values.
    pub fn n_complete(&self) -> usize {
        self.fractions.iter().filter(|&&f| f == 0.0).count()
    }

    /// Indices of columns whose missing fraction exceeds `threshold`.
    pub fn sparse_columns(&self, threshold: f32) -> Vec<usize> {
        self.fractions
            .iter()
            .enumerate()
            .filter(|&(_, &f)| f > threshold)
            .map(|(i, _)| i)
            .collect()
    }

    /// Distinct missing-fraction levels (rounded to 1e-3) with column counts,
    /// sorted ascending. Two levels means the bimodal pattern.
    pub fn levels(&self) -> Vec<(f32, usize)> {
        let mut rounded: Vec<u32> = self
            .fractions
            .iter()
            .map(|&f| (f * 1000.0).round() as u32)
            .collect();
        rounded.sort_unstable();

        let mut levels = Vec::new();
        let mut i = 0;
        while i < rounded.len() {
            let mut j = i + 1;
            while j < rounded.len() && rounded[j] == rounded[i] {
                j += 1;
            }
            levels.push((rounded[i] as f32 / 1000.0, j - i));
            i = j;
        }
        levels
    }
}

impl fmt::Display for MissingProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} columns over {} rows: {} complete, levels",
            self.n_columns(),
            self.n_rows,
            self.n_complete()
        )?;
        for (level, count) in self.levels() {
            write!(f, " {:.1}%x{}", level * 100.0, count)?;
        }
        Ok(())
    }
}
