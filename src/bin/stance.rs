//! Posture classification pipeline runner.
//!
//! Loads the raw recording CSV, cleans it, trains the two base forests and
//! the stacked meta-classifier, and prints the evaluation report.
//!
//! Usage:
//!   stance --data PATH [options]
//!
//! Options:
//!   --data PATH       Raw CSV export (required)
//!   --params PATH     JSON file overriding pipeline parameters
//!   --out-json PATH   Also write the report as JSON
//!   --threads N       0 = auto, 1 = sequential, n = exactly n (default: 0)
//!   --seed N          Partition/training seed (default: 42)
//!   --trees N         Trees per base forest
//!   --holdout F       Holdout fraction in (0, 1) (default: 0.3)
//!   --label NAME      Class column name (default: classe)
//!   --verbose         Per-stage and per-round training logs

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use stance::training::Verbosity;
use stance::{pipeline, run_with_threads, PipelineParams};

struct Args {
    data: PathBuf,
    params: Option<PathBuf>,
    out_json: Option<PathBuf>,
    threads: usize,
    seed: Option<u64>,
    trees: Option<u32>,
    holdout: Option<f32>,
    label: Option<String>,
    verbose: bool,
}

fn parse_args() -> Args {
    let mut data: Option<PathBuf> = None;
    let mut params: Option<PathBuf> = None;
    let mut out_json: Option<PathBuf> = None;
    let mut threads = 0usize;
    let mut seed: Option<u64> = None;
    let mut trees: Option<u32> = None;
    let mut holdout: Option<f32> = None;
    let mut label: Option<String> = None;
    let mut verbose = false;

    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--data" => data = Some(PathBuf::from(it.next().expect("--data path"))),
            "--params" => params = Some(PathBuf::from(it.next().expect("--params path"))),
            "--out-json" => out_json = Some(PathBuf::from(it.next().expect("--out-json path"))),
            "--threads" => threads = it.next().expect("--threads value").parse().unwrap(),
            "--seed" => seed = Some(it.next().expect("--seed value").parse().unwrap()),
            "--trees" => trees = Some(it.next().expect("--trees value").parse().unwrap()),
            "--holdout" => holdout = Some(it.next().expect("--holdout value").parse().unwrap()),
            "--label" => label = Some(it.next().expect("--label value")),
            "--verbose" => verbose = true,
            "--help" => {
                eprintln!(
                    "stance --data PATH [options]\n\n  --data PATH       Raw CSV export (required)\n  --params PATH     JSON file overriding pipeline parameters\n  --out-json PATH   Also write the report as JSON\n  --threads <n>     0 = auto, 1 = sequential, n = exactly n\n  --seed <n>        Partition/training seed\n  --trees <n>       Trees per base forest\n  --holdout <f>     Holdout fraction in (0, 1)\n  --label NAME      Class column name\n  --verbose         Per-stage and per-round training logs"
                );
                std::process::exit(0);
            }
            other => panic!("unknown arg: {other} (try --help)"),
        }
    }

    Args {
        data: data.expect("--data is required (try --help)"),
        params,
        out_json,
        threads,
        seed,
        trees,
        holdout,
        label,
        verbose,
    }
}

fn load_params(args: &Args) -> PipelineParams {
    let mut params = match &args.params {
        Some(path) => {
            let text = fs::read_to_string(path)
                .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()));
            serde_json::from_str(&text)
                .unwrap_or_else(|e| panic!("invalid params file {}: {e}", path.display()))
        }
        None => PipelineParams::default(),
    };

    // Flags override the params file.
    if let Some(seed) = args.seed {
        params.seed = seed;
    }
    if let Some(trees) = args.trees {
        params.stacking.narrow.n_trees = trees;
        params.stacking.wide.n_trees = trees;
    }
    if let Some(holdout) = args.holdout {
        params.holdout_fraction = holdout;
    }
    if let Some(label) = &args.label {
        params.label_column = label.clone();
    }
    if args.verbose {
        params.stacking.narrow.verbosity = Verbosity::Info;
        params.stacking.wide.verbosity = Verbosity::Info;
        params.stacking.meta.verbosity = Verbosity::Info;
    }
    params
}

fn main() -> ExitCode {
    let args = parse_args();

    if args.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    } else {
        env_logger::init();
    }

    let params = load_params(&args);
    let report = match run_with_threads(args.threads, |p| pipeline::run(&args.data, &params, p)) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("{report}");

    if let Some(path) = &args.out_json {
        let json = serde_json::to_string_pretty(&report).expect("report serializes");
        if let Err(e) = fs::write(path, json) {
            eprintln!("error: failed to write {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
        println!("report written to: {}", path.display());
    }

    ExitCode::SUCCESS
}
