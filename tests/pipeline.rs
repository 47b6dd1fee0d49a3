//! End-to-end pipeline runs over a synthetic recording export.

use std::fs;
use std::path::PathBuf;

use rand::prelude::*;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use stance::{pipeline, Parallelism, PipelineParams};

/// Five separable clusters in three sensor features, written in the raw
/// export shape: leading identifier columns, a ~98%-missing derived column,
/// and the label column last.
fn write_synthetic_csv(name: &str, n_per_class: usize, seed: u64) -> PathBuf {
    let classes = ["sitting", "sittingdown", "standing", "standingup", "walking"];
    let centers = [
        (-8.0f32, -8.0f32, 0.0f32),
        (-4.0, 8.0, 2.0),
        (0.0, -8.0, 4.0),
        (4.0, 8.0, 6.0),
        (8.0, -8.0, 8.0),
    ];
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

    let mut csv = String::from("row_id,user,accel_x,accel_y,accel_z,var_accel,classe\n");
    let mut row = 0usize;
    for (class, &(cx, cy, cz)) in centers.iter().enumerate() {
        for _ in 0..n_per_class {
            let x = cx + rng.gen_range(-1.0..1.0);
            let y = cy + rng.gen_range(-1.0..1.0);
            let z = cz + rng.gen_range(-0.5..0.5);
            // The derived column is populated on window boundaries only.
            let var = if row % 50 == 0 {
                format!("{:.3}", rng.gen_range(0.0..1.0))
            } else {
                String::new()
            };
            csv.push_str(&format!(
                "{},user{},{x:.4},{y:.4},{z:.4},{var},{}\n",
                row + 1,
                class + 1,
                classes[class]
            ));
            row += 1;
        }
    }

    let path = std::env::temp_dir().join(name);
    fs::write(&path, csv).unwrap();
    path
}

fn test_params() -> PipelineParams {
    let mut params = PipelineParams::default();
    params.cleaning.n_identifier_columns = 2;
    params.seed = 9;
    params.stacking.narrow.n_trees = 15;
    params.stacking.wide.n_trees = 15;
    params
}

#[test]
fn end_to_end_report() {
    let path = write_synthetic_csv("stance_pipeline_e2e.csv", 30, 1);
    let report = pipeline::run(&path, &test_params(), Parallelism::Sequential).unwrap();

    // Cleaning: 6 raw columns, 2 identifiers and 1 sparse dropped.
    let d = &report.dataset;
    assert_eq!(d.n_rows, 150);
    assert_eq!(d.n_raw_columns, 6);
    assert_eq!(d.dropped_identifiers, vec!["row_id", "user"]);
    assert_eq!(d.dropped_sparse, vec!["var_accel"]);
    assert_eq!(d.n_features, 3);

    // Stratified 70/30 partition over 30 samples per class.
    assert_eq!(d.n_train, 105);
    assert_eq!(d.n_test, 45);

    // Two base forests then the stacked model.
    assert_eq!(report.models.len(), 3);
    assert!(report.models[0].name.starts_with("forest(mtry="));
    assert!(report.models[1].name.starts_with("forest(mtry="));
    assert_eq!(report.models[2].name, "stacked");
    for model in &report.models[..2] {
        assert!(model.oob_error.is_some());
    }
    assert!(report.models[2].oob_error.is_none());

    // Separable clusters: every model scores high on the holdout.
    for model in &report.models {
        assert!(
            model.accuracy > 0.9,
            "{} accuracy too low: {}",
            model.name,
            model.accuracy
        );
        assert!(model.kappa > 0.85, "{} kappa too low: {}", model.name, model.kappa);
        assert_eq!(model.per_class.len(), 5);
    }

    // The rendered report carries the headline numbers.
    let text = report.to_string();
    assert!(text.contains("150 rows, 6 columns -> 3 features"));
    assert!(text.contains("partition: 105 train / 45 test"));
    assert!(text.contains("stacked: accuracy"));
}

#[test]
fn same_seed_reproduces_report() {
    let path = write_synthetic_csv("stance_pipeline_repro.csv", 20, 4);
    let params = test_params();

    let a = pipeline::run(&path, &params, Parallelism::Sequential).unwrap();
    let b = pipeline::run(&path, &params, Parallelism::Parallel).unwrap();

    // Bit-identical partitions and forests give bit-identical reports.
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn different_seeds_change_the_partition() {
    let path = write_synthetic_csv("stance_pipeline_seeds.csv", 20, 4);
    let mut params = test_params();

    let a = pipeline::run(&path, &params, Parallelism::Sequential).unwrap();
    params.seed = 10;
    let b = pipeline::run(&path, &params, Parallelism::Sequential).unwrap();

    // Partition sizes match, the confusion counts (almost surely) do not.
    assert_eq!(a.dataset.n_test, b.dataset.n_test);
    assert_ne!(
        serde_json::to_string(&a.models).unwrap(),
        serde_json::to_string(&b.models).unwrap()
    );
}

#[test]
fn report_serializes_to_json() {
    let path = write_synthetic_csv("stance_pipeline_json.csv", 20, 7);
    let report = pipeline::run(&path, &test_params(), Parallelism::Sequential).unwrap();

    let json = serde_json::to_string_pretty(&report).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["dataset"]["n_rows"], 100);
    assert_eq!(value["models"].as_array().unwrap().len(), 3);
    assert!(value["models"][2]["accuracy"].as_f64().unwrap() > 0.8);
}

#[test]
fn missing_file_is_an_io_error() {
    let params = PipelineParams::default();
    let err = pipeline::run(
        std::path::Path::new("/nonexistent/recording.csv"),
        &params,
        Parallelism::Sequential,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        stance::PipelineError::Dataset(stance::DatasetError::Io(_))
    ));
}
