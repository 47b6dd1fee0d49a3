//! The cleaned-sample container.

use ndarray::{Array2, ArrayView1, ArrayView2};

use super::{DatasetError, DatasetSchema};

// =============================================================================
// SampleAccessor
// =============================================================================

/// Per-sample feature access for tree traversal.
///
/// Implemented for plain slices (sample-major callers) and for
/// [`SampleView`] (a column of a feature-major [`Dataset`]).
pub trait SampleAccessor {
    /// Value of feature `index` for this sample. NaN means missing.
    fn feature(&self, index: usize) -> f32;
}

impl SampleAccessor for [f32] {
    #[inline]
    fn feature(&self, index: usize) -> f32 {
        self[index]
    }
}

impl SampleAccessor for &[f32] {
    #[inline]
    fn feature(&self, index: usize) -> f32 {
        self[index]
    }
}

/// One sample of a feature-major matrix.
#[derive(Clone, Copy)]
pub struct SampleView<'a> {
    features: &'a Array2<f32>,
    sample: usize,
}

impl SampleAccessor for SampleView<'_> {
    #[inline]
    fn feature(&self, index: usize) -> f32 {
        self.features[[index, self.sample]]
    }
}

// =============================================================================
// Dataset
// =============================================================================

/// Features, labels, and schema for a set of samples.
///
/// Features are feature-major: `[n_features, n_samples]`, so each feature's
/// values are contiguous for split search. Labels are class indices.
#[derive(Clone, Debug)]
pub struct Dataset {
    features: Array2<f32>,
    labels: Vec<u32>,
    schema: DatasetSchema,
    n_classes: usize,
}

impl Dataset {
    /// Assemble a dataset, validating shapes and label range.
    ///
    /// `features` is `[n_features, n_samples]`. Labels must be below
    /// [`ActivityClass::COUNT`](super::ActivityClass::COUNT).
    pub fn new(
        features: Array2<f32>,
        labels: Vec<u32>,
        schema: DatasetSchema,
    ) -> Result<Self, DatasetError> {
        Self::with_classes(features, labels, schema, super::ActivityClass::COUNT)
    }

    /// Assemble a dataset with an explicit class count.
    pub fn with_classes(
        features: Array2<f32>,
        labels: Vec<u32>,
        schema: DatasetSchema,
        n_classes: usize,
    ) -> Result<Self, DatasetError> {
        let (n_features, n_samples) = features.dim();
        if labels.len() != n_samples || schema.n_features() != n_features {
            return Err(DatasetError::ShapeMismatch {
                n_features,
                n_samples,
                n_labels: labels.len(),
            });
        }
        if let Some(&bad) = labels.iter().find(|&&l| l as usize >= n_classes) {
            return Err(DatasetError::LabelOutOfRange {
                index: bad,
                n_classes,
            });
        }
        Ok(Self {
            features,
            labels,
            schema,
            n_classes,
        })
    }

    /// Number of samples.
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.features.ncols()
    }

    /// Number of features.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.features.nrows()
    }

    /// Number of classes labels are drawn from.
    #[inline]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// The feature-major matrix `[n_features, n_samples]`.
    #[inline]
    pub fn features(&self) -> ArrayView2<'_, f32> {
        self.features.view()
    }

    /// One feature across all samples (contiguous).
    #[inline]
    pub fn feature(&self, index: usize) -> ArrayView1<'_, f32> {
        self.features.row(index)
    }

    /// Class indices, one per sample.
    #[inline]
    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    /// Schema with feature names.
    #[inline]
    pub fn schema(&self) -> &DatasetSchema {
        &self.schema
    }

    /// A single feature value.
    #[inline]
    pub fn value(&self, feature: usize, sample: usize) -> f32 {
        self.features[[feature, sample]]
    }

    /// Traversable view of one sample.
    #[inline]
    pub fn sample(&self, index: usize) -> SampleView<'_> {
        SampleView {
            features: &self.features,
            sample: index,
        }
    }

    /// Per-class label counts.
    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.n_classes];
        for &l in &self.labels {
            counts[l as usize] += 1;
        }
        counts
    }

    /// Copy out the samples at `indices`, preserving their order.
    ///
    /// Used to materialize the train/test partitions.
    pub fn subset(&self, indices: &[usize]) -> Self {
        let n_features = self.n_features();
        let mut features = Array2::<f32>::zeros((n_features, indices.len()));
        for (out_col, &src) in indices.iter().enumerate() {
            for f in 0..n_features {
                features[[f, out_col]] = self.features[[f, src]];
            }
        }
        let labels = indices.iter().map(|&i| self.labels[i]).collect();
        Self {
            features,
            labels,
            schema: self.schema.clone(),
            n_classes: self.n_classes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn small_dataset() -> Dataset {
        // 2 features, 4 samples
        let features = array![[1.0, 2.0, 3.0, 4.0], [10.0, 20.0, 30.0, 40.0]];
        Dataset::new(features, vec![0, 1, 2, 1], DatasetSchema::unnamed(2)).unwrap()
    }

    #[test]
    fn dimensions_and_access() {
        let ds = small_dataset();
        assert_eq!(ds.n_samples(), 4);
        assert_eq!(ds.n_features(), 2);
        assert_eq!(ds.value(1, 2), 30.0);
        assert_eq!(ds.feature(0).to_vec(), vec![1.0, 2.0, 3.0, 4.0]);

        let sample = ds.sample(3);
        assert_eq!(sample.feature(0), 4.0);
        assert_eq!(sample.feature(1), 40.0);
    }

    #[test]
    fn class_counts() {
        let ds = small_dataset();
        assert_eq!(ds.class_counts(), vec![1, 2, 1, 0, 0]);
    }

    #[test]
    fn subset_preserves_order_and_labels() {
        let ds = small_dataset();
        let sub = ds.subset(&[3, 0]);
        assert_eq!(sub.n_samples(), 2);
        assert_eq!(sub.labels(), &[1, 0]);
        assert_eq!(sub.value(0, 0), 4.0);
        assert_eq!(sub.value(1, 1), 10.0);
    }

    #[test]
    fn rejects_shape_mismatch() {
        let features = array![[1.0, 2.0], [3.0, 4.0]];
        let err = Dataset::new(features, vec![0, 1, 0], DatasetSchema::unnamed(2));
        assert!(matches!(err, Err(DatasetError::ShapeMismatch { .. })));
    }

    #[test]
    fn rejects_label_out_of_range() {
        let features = array![[1.0, 2.0]];
        let err = Dataset::new(features, vec![0, 9], DatasetSchema::unnamed(1));
        assert!(matches!(err, Err(DatasetError::LabelOutOfRange { .. })));
    }

    #[test]
    fn slice_sample_accessor() {
        let sample: &[f32] = &[0.5, 1.5];
        assert_eq!(sample.feature(1), 1.5);
    }
}
