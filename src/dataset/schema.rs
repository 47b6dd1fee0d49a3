//! Feature metadata.

/// Metadata for a single feature.
///
/// All features in this pipeline are numeric sensor readings stored as `f32`;
/// the schema carries their names through cleaning and into reports.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FeatureMeta {
    /// Feature name (the raw column header).
    pub name: Option<String>,
}

impl FeatureMeta {
    /// Create unnamed metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create metadata with a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// Schema describing the feature columns of a [`Dataset`](super::Dataset).
#[derive(Clone, Debug, Default)]
pub struct DatasetSchema {
    features: Vec<FeatureMeta>,
}

impl DatasetSchema {
    /// Create a schema with the given feature metadata.
    pub fn from_features(features: Vec<FeatureMeta>) -> Self {
        Self { features }
    }

    /// Create a schema of `n` unnamed numeric features.
    pub fn unnamed(n: usize) -> Self {
        Self {
            features: vec![FeatureMeta::default(); n],
        }
    }

    /// Create a schema from column names.
    pub fn from_names<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            features: names.into_iter().map(FeatureMeta::named).collect(),
        }
    }

    /// Number of features.
    pub fn n_features(&self) -> usize {
        self.features.len()
    }

    /// Metadata for a feature.
    pub fn feature(&self, index: usize) -> &FeatureMeta {
        &self.features[index]
    }

    /// Feature name, or a positional fallback like `"f12"`.
    pub fn feature_name(&self, index: usize) -> String {
        self.features[index]
            .name
            .clone()
            .unwrap_or_else(|| format!("f{index}"))
    }

    /// All feature names in order (positional fallbacks where unnamed).
    pub fn feature_names(&self) -> Vec<String> {
        (0..self.features.len())
            .map(|i| self.feature_name(i))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_and_fallback_names() {
        let schema =
            DatasetSchema::from_features(vec![FeatureMeta::named("roll_belt"), FeatureMeta::new()]);
        assert_eq!(schema.n_features(), 2);
        assert_eq!(schema.feature_name(0), "roll_belt");
        assert_eq!(schema.feature_name(1), "f1");
    }

    #[test]
    fn from_names_preserves_order() {
        let schema = DatasetSchema::from_names(["a", "b", "c"]);
        assert_eq!(schema.feature_names(), vec!["a", "b", "c"]);
    }
}
