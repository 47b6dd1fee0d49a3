//! End-to-end pipeline orchestration.
//!
//! The linear flow: load the raw CSV, apply the cleaning policy, partition
//! with a stratified holdout, train the stacked ensemble, and evaluate every
//! model on the holdout. Each stage runs once, sequentially; [`run`] returns
//! the full [`EvalReport`].

use std::fmt;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clean::CleaningPolicy;
use crate::dataset::{ActivityClass, Dataset, DatasetError};
use crate::io::read_raw_csv;
use crate::split::stratified_split;
use crate::stacking::{one_hot_meta_features, StackedEnsemble, StackingParams};
use crate::training::ConfusionMatrix;
use crate::utils::Parallelism;

/// Seed-mixing constant for the wide base forest.
const WIDE_SEED_MIX: u64 = 0x0057_ACED;

// =============================================================================
// PipelineParams
// =============================================================================

/// Parameters for the whole pipeline.
///
/// Deserializable from JSON, with every field defaulted, so a params file
/// only needs to name the knobs it overrides. The top-level `seed` drives
/// the partition and both base forests.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineParams {
    /// Name of the class column in the raw export.
    pub label_column: String,
    /// Column-level cleaning policy.
    pub cleaning: CleaningPolicy,
    /// Fraction of samples held out for evaluation.
    pub holdout_fraction: f32,
    /// Seed for the partition and the base forests.
    pub seed: u64,
    /// Base forests and meta-classifier.
    pub stacking: StackingParams,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            label_column: "classe".to_string(),
            cleaning: CleaningPolicy::default(),
            holdout_fraction: 0.3,
            seed: 42,
            stacking: StackingParams::default(),
        }
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Errors from running the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("training rejected its input (no samples, no features, or no trees)")]
    Training,
}

// =============================================================================
// EvalReport
// =============================================================================

/// What the cleaning and partition stages produced.
#[derive(Clone, Debug, Serialize)]
pub struct DatasetReport {
    /// Rows in the raw export.
    pub n_rows: usize,
    /// Non-label columns in the raw export.
    pub n_raw_columns: usize,
    /// Features surviving cleaning.
    pub n_features: usize,
    /// Dropped leading identifier columns.
    pub dropped_identifiers: Vec<String>,
    /// Dropped sparse columns.
    pub dropped_sparse: Vec<String>,
    /// Distinct missing-fraction levels with column counts.
    pub missing_levels: Vec<(f32, usize)>,
    /// Training-partition size.
    pub n_train: usize,
    /// Holdout-partition size.
    pub n_test: usize,
    /// Class names in index order.
    pub class_names: Vec<String>,
}

/// Per-class holdout rates.
#[derive(Clone, Debug, Serialize)]
pub struct ClassRates {
    pub class: String,
    pub recall: f64,
    pub precision: f64,
}

/// One model's holdout evaluation.
#[derive(Clone, Debug, Serialize)]
pub struct ModelReport {
    /// Model name, e.g. `forest(mtry=7)` or `stacked`.
    pub name: String,
    /// Holdout accuracy.
    pub accuracy: f64,
    /// Holdout Cohen's Kappa.
    pub kappa: f64,
    /// OOB error from training; base forests only.
    pub oob_error: Option<f64>,
    /// Per-class recall and precision.
    pub per_class: Vec<ClassRates>,
    /// Holdout confusion matrix.
    pub confusion: ConfusionMatrix,
}

impl ModelReport {
    fn from_predictions(
        name: String,
        truth: &[u32],
        predicted: &[u32],
        oob_error: Option<f64>,
        class_names: &[String],
    ) -> Self {
        let confusion = ConfusionMatrix::from_predictions(class_names.len(), truth, predicted);
        let per_class = class_names
            .iter()
            .enumerate()
            .map(|(c, name)| ClassRates {
                class: name.clone(),
                recall: confusion.recall(c),
                precision: confusion.precision(c),
            })
            .collect();
        Self {
            name,
            accuracy: confusion.accuracy(),
            kappa: confusion.kappa(),
            oob_error,
            per_class,
            confusion,
        }
    }
}

/// The pipeline's output: dataset summary plus per-model evaluations.
///
/// The model list is the two base forests followed by the stacked ensemble,
/// so the marginal value of stacking is visible. `Display` renders the
/// human-readable tables; `Serialize` backs `--out-json`.
#[derive(Clone, Debug, Serialize)]
pub struct EvalReport {
    pub dataset: DatasetReport,
    pub models: Vec<ModelReport>,
}

impl fmt::Display for EvalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.dataset;
        writeln!(
            f,
            "dataset: {} rows, {} columns -> {} features ({} identifier, {} sparse dropped)",
            d.n_rows,
            d.n_raw_columns,
            d.n_features,
            d.dropped_identifiers.len(),
            d.dropped_sparse.len()
        )?;
        write!(f, "missing levels:")?;
        for &(level, count) in &d.missing_levels {
            write!(f, " {:.1}%x{}", level * 100.0, count)?;
        }
        writeln!(f)?;
        writeln!(f, "partition: {} train / {} test", d.n_train, d.n_test)?;

        for model in &self.models {
            writeln!(f)?;
            write!(
                f,
                "{}: accuracy {:.4}, kappa {:.4}",
                model.name, model.accuracy, model.kappa
            )?;
            if let Some(oob) = model.oob_error {
                write!(f, ", oob-error {oob:.4}")?;
            }
            writeln!(f)?;
            write!(f, "{}", model.confusion.render(&d.class_names))?;
            writeln!(f, "{:>12} {:>8} {:>9}", "class", "recall", "precision")?;
            for rates in &model.per_class {
                writeln!(
                    f,
                    "{:>12} {:>8.4} {:>9.4}",
                    rates.class, rates.recall, rates.precision
                )?;
            }
        }
        Ok(())
    }
}

// =============================================================================
// run
// =============================================================================

/// Run the whole pipeline on the raw CSV at `path`.
pub fn run(
    path: &Path,
    params: &PipelineParams,
    parallelism: Parallelism,
) -> Result<EvalReport, PipelineError> {
    info!("loading {}", path.display());
    let table = read_raw_csv(path, &params.label_column)?;

    info!("cleaning");
    let (dataset, summary) = params.cleaning.apply(&table)?;

    info!(
        "partitioning ({:.0}% holdout, seed {})",
        params.holdout_fraction * 100.0,
        params.seed
    );
    let (train_idx, test_idx) = stratified_split(
        dataset.labels(),
        dataset.n_classes(),
        params.holdout_fraction,
        params.seed,
    );
    let train = dataset.subset(&train_idx);
    let test = dataset.subset(&test_idx);

    info!(
        "training stacked ensemble ({} + {} trees)",
        params.stacking.narrow.n_trees, params.stacking.wide.n_trees
    );
    let mut stacking = params.stacking.clone();
    stacking.narrow.seed = params.seed;
    stacking.wide.seed = params.seed ^ WIDE_SEED_MIX;
    let fit =
        StackedEnsemble::train(&train, &stacking, parallelism).ok_or(PipelineError::Training)?;

    info!("evaluating on {} holdout samples", test.n_samples());
    let class_names = ActivityClass::names();
    let n_features = train.n_features();
    let (narrow_pred, wide_pred) = fit
        .ensemble
        .base_predictions(test.features(), parallelism);
    let meta_features = one_hot_meta_features(&narrow_pred, &wide_pred, test.n_classes());
    let stacked_pred = fit.ensemble.meta().predict_class(meta_features.view());

    let models = vec![
        ModelReport::from_predictions(
            format!("forest(mtry={})", stacking.narrow.mtry.resolve(n_features)),
            test.labels(),
            &narrow_pred,
            fit.narrow_oob,
            &class_names,
        ),
        ModelReport::from_predictions(
            format!("forest(mtry={})", stacking.wide.mtry.resolve(n_features)),
            test.labels(),
            &wide_pred,
            fit.wide_oob,
            &class_names,
        ),
        ModelReport::from_predictions(
            "stacked".to_string(),
            test.labels(),
            &stacked_pred,
            None,
            &class_names,
        ),
    ];
    for model in &models {
        info!(
            "{}: accuracy {:.4}, kappa {:.4}",
            model.name, model.accuracy, model.kappa
        );
    }

    Ok(EvalReport {
        dataset: build_dataset_report(&summary, &dataset, train_idx.len(), test_idx.len()),
        models,
    })
}

fn build_dataset_report(
    summary: &crate::clean::CleaningSummary,
    dataset: &Dataset,
    n_train: usize,
    n_test: usize,
) -> DatasetReport {
    DatasetReport {
        n_rows: summary.n_rows,
        n_raw_columns: summary.n_raw_columns,
        n_features: dataset.n_features(),
        dropped_identifiers: summary.dropped_identifiers.clone(),
        dropped_sparse: summary.dropped_sparse.clone(),
        missing_levels: summary.profile.levels(),
        n_train,
        n_test,
        class_names: ActivityClass::names(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_default() {
        let params = PipelineParams::default();
        assert_eq!(params.label_column, "classe");
        assert_eq!(params.holdout_fraction, 0.3);
        assert_eq!(params.seed, 42);
        assert_eq!(params.cleaning.n_identifier_columns, 7);
    }

    #[test]
    fn params_partial_json_override() {
        let params: PipelineParams =
            serde_json::from_str(r#"{"seed": 7, "holdout_fraction": 0.2}"#).unwrap();
        assert_eq!(params.seed, 7);
        assert_eq!(params.holdout_fraction, 0.2);
        // Everything else keeps its default.
        assert_eq!(params.label_column, "classe");
        assert_eq!(params.stacking.narrow.n_trees, 100);
    }

    #[test]
    fn params_nested_json_override() {
        let params: PipelineParams = serde_json::from_str(
            r#"{
                "cleaning": {"n_identifier_columns": 2},
                "stacking": {"narrow": {"n_trees": 10}, "wide": {"n_trees": 10}}
            }"#,
        )
        .unwrap();
        assert_eq!(params.cleaning.n_identifier_columns, 2);
        // Defaulted within the overridden struct.
        assert_eq!(params.cleaning.max_missing_fraction, 0.97);
        assert_eq!(params.stacking.narrow.n_trees, 10);
        assert_eq!(params.stacking.meta.n_rounds, 200);
    }

    #[test]
    fn model_report_rates() {
        let truth = [0u32, 0, 1, 1];
        let predicted = [0u32, 1, 1, 1];
        let names = vec!["a".to_string(), "b".to_string()];
        let report =
            ModelReport::from_predictions("m".into(), &truth, &predicted, Some(0.1), &names);
        assert_eq!(report.accuracy, 0.75);
        assert_eq!(report.oob_error, Some(0.1));
        assert_eq!(report.per_class.len(), 2);
        assert_eq!(report.per_class[0].recall, 0.5);
        assert_eq!(report.per_class[1].precision, 2.0 / 3.0);
    }

    #[test]
    fn report_display_lists_models() {
        let truth = [0u32, 1, 2, 3, 4];
        let names = ActivityClass::names();
        let model = ModelReport::from_predictions("stacked".into(), &truth, &truth, None, &names);
        let report = EvalReport {
            dataset: DatasetReport {
                n_rows: 5,
                n_raw_columns: 10,
                n_features: 3,
                dropped_identifiers: vec!["id".into()],
                dropped_sparse: vec!["var_x".into(), "var_y".into(), "var_z".into(), "var_w".into(), "var_v".into(), "var_u".into()],
                missing_levels: vec![(0.0, 4), (0.98, 6)],
                n_train: 3,
                n_test: 2,
                class_names: names,
            },
            models: vec![model],
        };
        let text = report.to_string();
        assert!(text.contains("5 rows, 10 columns -> 3 features"));
        assert!(text.contains("98.0%x6"));
        assert!(text.contains("stacked: accuracy 1.0000, kappa 1.0000"));
        assert!(text.contains("sittingdown"));
    }
}
